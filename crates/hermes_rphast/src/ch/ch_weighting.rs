use crate::{
    distance::{Distance, Meters},
    weighting::{Milliseconds, Weight, Weighting},
};

use super::{ch_edge::CHGraphEdge, ch_storage::CHStorage};

/// Reads the costs frozen onto the hierarchy edges at preparation time.
#[derive(Default)]
pub struct CHWeighting;

impl CHWeighting {
    pub fn new() -> Self {
        CHWeighting
    }
}

impl Weighting<CHStorage> for CHWeighting {
    fn calc_edge_weight(&self, edge: &CHGraphEdge) -> Weight {
        edge.costs().weight
    }

    fn calc_edge_ms(&self, edge: &CHGraphEdge) -> Milliseconds {
        edge.costs().time
    }

    fn calc_edge_distance(&self, edge: &CHGraphEdge) -> Distance<Meters> {
        edge.costs().distance
    }
}
