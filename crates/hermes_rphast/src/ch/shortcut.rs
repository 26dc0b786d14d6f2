use crate::types::{EdgeId, NodeId};

use super::ch_edge::EdgeCosts;

/// Edge `start -> end` replacing the two-edge path `incoming_edge`, `outgoing_edge`
/// around a contracted node.
#[derive(Debug, Clone, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct Shortcut {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    pub costs: EdgeCosts,

    pub incoming_edge: EdgeId,
    pub outgoing_edge: EdgeId,
}
