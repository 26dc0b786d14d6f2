use crate::{
    distance::{Distance, Meters},
    types::{EdgeId, NodeId},
};

pub trait GraphEdge {
    fn start_node(&self) -> NodeId;
    fn end_node(&self) -> NodeId;
    fn distance(&self) -> Distance<Meters>;
}

pub trait Graph {
    type Edge: GraphEdge;

    fn node_count(&self) -> usize;
    fn edge_count(&self) -> usize;
    fn edge(&self, edge_id: EdgeId) -> &Self::Edge;
}

pub trait NodeRank {
    /// Contraction order of the node, `UNRANKED` if the node was never contracted
    fn node_rank(&self, node_id: NodeId) -> usize;
}

/// Upward/downward split of a contraction hierarchy.
pub trait HierarchyEdgeAccess {
    /// Edges `node -> v` where `v` outranks `node`
    fn upward_edges(&self, node_id: NodeId) -> &[EdgeId];

    /// Edges `u -> node` where `u` outranks `node`
    fn downward_edges_into(&self, node_id: NodeId) -> &[EdgeId];
}

/// A prepared hierarchy that can be searched concurrently.
pub trait HierarchyGraph: Graph + NodeRank + HierarchyEdgeAccess + Sync {}

impl<G> HierarchyGraph for G where G: Graph + NodeRank + HierarchyEdgeAccess + Sync {}
