//! Restricted PHAST: one-to-many searches over a contraction hierarchy where the downward
//! sweep only visits the part of the hierarchy that can reach the destinations.
//!
//! The destination-dependent part is computed once per destination set by [`subgraph`], then
//! every source runs an upward search over the whole hierarchy followed by a sweep over that
//! subgraph in [`rphast_search`]. Results are collected per destination in [`multi_tree`].

pub mod multi_tree;
pub mod rphast_search;
pub mod subgraph;
