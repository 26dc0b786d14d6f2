use thiserror::Error;

use crate::types::{EdgeId, NodeId};

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Hierarchy has not been prepared: {0} nodes have no rank")]
    NotPrepared(usize),
    #[error("Node {0} has no rank")]
    UnrankedNode(NodeId),
    #[error("Rank {rank} is assigned to both node {first} and node {second}")]
    DuplicateRank {
        rank: usize,
        first: NodeId,
        second: NodeId,
    },
    #[error("Node {node} has rank {rank}, ranks must be below {node_count}")]
    RankOutOfBounds {
        node: NodeId,
        rank: usize,
        node_count: usize,
    },
    #[error("Node {node} is out of bounds, the hierarchy has {node_count} nodes")]
    NodeOutOfBounds { node: NodeId, node_count: usize },
    #[error("Edge {0} starts and ends at the same node")]
    SelfLoop(EdgeId),
    #[error("Shortcut {shortcut} is invalid: {reason}")]
    InvalidShortcut { shortcut: EdgeId, reason: String },
    #[error("Edge {edge} from node {start} to node {end} does not follow the rank order")]
    RankViolation {
        edge: EdgeId,
        start: NodeId,
        end: NodeId,
    },
    #[error("Unsupported hierarchy format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Failed to read or write hierarchy file")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize hierarchy: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("No sources given")]
    EmptySources,
    #[error("No destinations given")]
    EmptyDestinations,
    #[error("No metrics requested")]
    NoMetrics,
    #[error("Unknown distance unit {0}")]
    InvalidUnits(String),
    #[error("Invalid configuration value {value} for {key}")]
    InvalidConfig { key: &'static str, value: String },
    #[error("Node {node} is out of bounds, the graph has {node_count} nodes")]
    NodeOutOfBounds { node: NodeId, node_count: usize },
    #[error("Search has no subgraph, it must be prepared first")]
    NotPrepared,
    #[error("Destination {0} is not part of the prepared subgraph")]
    DestinationNotInSubGraph(NodeId),
    #[error("Matrix computation was cancelled")]
    Cancelled,
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    #[error("Failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
