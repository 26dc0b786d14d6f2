pub mod ch;
pub mod constants;
pub mod distance;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod stopwatch;
pub(crate) mod storage;
pub mod types;
pub mod weighting;

#[cfg(test)]
mod test_graph_utils;
