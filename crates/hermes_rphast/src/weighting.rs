use crate::{
    distance::{Distance, Meters},
    graph::Graph,
    matrix::matrix_metrics::Metric,
};

pub type Weight = u32;
pub type Milliseconds = u32;

/// Accumulated cost of a path for one metric, in the metric's raw unit
/// (weighting units, milliseconds or nanometres).
pub type Cost = u64;

/// Scalar costs of traversing an edge in its own direction.
pub trait Weighting<G>: Sync
where
    G: Graph,
{
    fn calc_edge_weight(&self, edge: &G::Edge) -> Weight;
    fn calc_edge_ms(&self, edge: &G::Edge) -> Milliseconds;
    fn calc_edge_distance(&self, edge: &G::Edge) -> Distance<Meters>;

    fn calc_edge_cost(&self, edge: &G::Edge, metric: Metric) -> Cost {
        match metric {
            Metric::Duration => self.calc_edge_ms(edge) as Cost,
            Metric::Distance => self.calc_edge_distance(edge).nanometers() as Cost,
            Metric::Weight => self.calc_edge_weight(edge) as Cost,
        }
    }
}
