use std::path::Path;

use rkyv::util::AlignedVec;
use tracing::{debug, info};

use crate::{
    constants::{CH_STORAGE_VERSION, MAX_WEIGHT, UNRANKED},
    error::HierarchyError,
    graph::{Graph, GraphEdge, HierarchyEdgeAccess, NodeRank},
    storage::{read_bytes, write_bytes},
    types::{EdgeId, NodeId},
};

use super::{
    ch_edge::{CHBaseEdge, CHGraphEdge, EdgeCosts},
    shortcut::Shortcut,
};

/// Persisted part of a hierarchy, the adjacency is rebuilt and revalidated on load.
#[derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
struct CHStorageData {
    version: u32,
    nodes: usize,
    ranks: Vec<usize>,
    edges: Vec<CHGraphEdge>,
}

/// A prepared, immutable contraction hierarchy.
///
/// Only obtainable through [`CHStorageBuilder::build`] or [`CHStorage::from_file`], both of which
/// reject hierarchies whose ranks or shortcuts are inconsistent.
pub struct CHStorage {
    nodes: usize,
    edges: Vec<CHGraphEdge>,
    ranks: Vec<usize>,

    /// For each node, the edges leading to a higher ranked node
    upward_edges: Vec<Vec<EdgeId>>,

    /// For each node, the edges arriving from a higher ranked node
    downward_edges: Vec<Vec<EdgeId>>,
}

impl CHStorage {
    pub fn save_to_file(&self, path: &Path) -> Result<(), HierarchyError> {
        let data = CHStorageData {
            version: CH_STORAGE_VERSION,
            nodes: self.nodes,
            ranks: self.ranks.clone(),
            edges: self.edges.clone(),
        };
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&data)
            .map_err(|error| HierarchyError::Serialization(error.to_string()))?;
        write_bytes(&bytes[..], path)?;
        debug!("Wrote hierarchy to {}, size {}", path.display(), bytes.len());
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self, HierarchyError> {
        debug!("Reading hierarchy from path {}", path.display());
        let bytes = read_bytes(path)?;
        debug!("Read from path {}, size {}", path.display(), bytes.len());

        // The file buffer carries no alignment guarantee
        let mut aligned: AlignedVec = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(&bytes);

        let data = rkyv::from_bytes::<CHStorageData, rkyv::rancor::Error>(&aligned)
            .map_err(|error| HierarchyError::Serialization(error.to_string()))?;

        if data.version != CH_STORAGE_VERSION {
            return Err(HierarchyError::UnsupportedVersion {
                found: data.version,
                expected: CH_STORAGE_VERSION,
            });
        }

        let storage = CHStorageBuilder {
            nodes: data.nodes,
            ranks: data.ranks,
            edges: data.edges,
            invalid_node: None,
        }
        .build()?;

        info!(
            "Deserialized hierarchy with {} nodes and {} edges",
            storage.node_count(),
            storage.edge_count()
        );
        Ok(storage)
    }

    pub fn shortcut_count(&self) -> usize {
        self.edges.iter().filter(|edge| edge.is_shortcut()).count()
    }
}

impl Graph for CHStorage {
    type Edge = CHGraphEdge;

    fn node_count(&self) -> usize {
        self.nodes
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn edge(&self, edge_id: EdgeId) -> &CHGraphEdge {
        &self.edges[edge_id]
    }
}

impl NodeRank for CHStorage {
    fn node_rank(&self, node_id: NodeId) -> usize {
        self.ranks[node_id]
    }
}

impl HierarchyEdgeAccess for CHStorage {
    fn upward_edges(&self, node_id: NodeId) -> &[EdgeId] {
        &self.upward_edges[node_id]
    }

    fn downward_edges_into(&self, node_id: NodeId) -> &[EdgeId] {
        &self.downward_edges[node_id]
    }
}

/// Collects the ranks and edges produced by a contraction and turns them into a [`CHStorage`].
pub struct CHStorageBuilder {
    nodes: usize,
    ranks: Vec<usize>,
    edges: Vec<CHGraphEdge>,
    /// First node given a rank outside `0..nodes`, reported by [`CHStorageBuilder::build`]
    invalid_node: Option<NodeId>,
}

impl CHStorageBuilder {
    pub fn new(nodes: usize) -> Self {
        Self {
            nodes,
            ranks: vec![UNRANKED; nodes],
            edges: Vec::new(),
            invalid_node: None,
        }
    }

    pub fn set_node_rank(&mut self, node: NodeId, rank: usize) -> &mut Self {
        match self.ranks.get_mut(node) {
            Some(slot) => *slot = rank,
            None => {
                self.invalid_node.get_or_insert(node);
            }
        }
        self
    }

    pub fn add_edge(&mut self, start: NodeId, end: NodeId, costs: EdgeCosts) -> EdgeId {
        let id = self.edges.len();
        self.edges.push(CHGraphEdge::Edge(CHBaseEdge {
            id,
            start,
            end,
            costs,
        }));
        id
    }

    pub fn add_shortcut(
        &mut self,
        start: NodeId,
        end: NodeId,
        costs: EdgeCosts,
        incoming_edge: EdgeId,
        outgoing_edge: EdgeId,
    ) -> EdgeId {
        let id = self.edges.len();
        self.edges.push(CHGraphEdge::Shortcut(Shortcut {
            id,
            start,
            end,
            costs,
            incoming_edge,
            outgoing_edge,
        }));
        id
    }

    pub fn build(self) -> Result<CHStorage, HierarchyError> {
        if let Some(node) = self.invalid_node {
            return Err(HierarchyError::NodeOutOfBounds {
                node,
                node_count: self.nodes,
            });
        }

        self.check_ranks()?;

        let mut upward_edges = vec![Vec::new(); self.nodes];
        let mut downward_edges = vec![Vec::new(); self.nodes];

        for (index, edge) in self.edges.iter().enumerate() {
            self.check_edge(index, edge)?;

            if let CHGraphEdge::Edge(base) = edge
                && base.costs.weight == MAX_WEIGHT
            {
                continue;
            }

            let start = edge.start_node();
            let end = edge.end_node();
            if self.ranks[end] > self.ranks[start] {
                upward_edges[start].push(index);
            } else {
                downward_edges[end].push(index);
            }
        }

        Ok(CHStorage {
            nodes: self.nodes,
            edges: self.edges,
            ranks: self.ranks,
            upward_edges,
            downward_edges,
        })
    }

    fn check_ranks(&self) -> Result<(), HierarchyError> {
        let unranked = self.ranks.iter().filter(|&&rank| rank == UNRANKED).count();
        if unranked > 0 {
            return Err(HierarchyError::NotPrepared(unranked));
        }

        let mut owners: Vec<Option<NodeId>> = vec![None; self.nodes];
        for (node, &rank) in self.ranks.iter().enumerate() {
            if rank >= self.nodes {
                return Err(HierarchyError::RankOutOfBounds {
                    node,
                    rank,
                    node_count: self.nodes,
                });
            }

            if let Some(first) = owners[rank] {
                return Err(HierarchyError::DuplicateRank {
                    rank,
                    first,
                    second: node,
                });
            }
            owners[rank] = Some(node);
        }

        Ok(())
    }

    fn check_node(&self, node: NodeId) -> Result<(), HierarchyError> {
        if node >= self.nodes {
            return Err(HierarchyError::NodeOutOfBounds {
                node,
                node_count: self.nodes,
            });
        }
        Ok(())
    }

    fn check_edge(&self, index: EdgeId, edge: &CHGraphEdge) -> Result<(), HierarchyError> {
        if edge.id() != index {
            return Err(HierarchyError::Serialization(format!(
                "edge stored at {} carries id {}",
                index,
                edge.id()
            )));
        }

        self.check_node(edge.start_node())?;
        self.check_node(edge.end_node())?;

        if edge.start_node() == edge.end_node() {
            return Err(HierarchyError::SelfLoop(index));
        }

        match edge {
            CHGraphEdge::Edge(_) => Ok(()),
            CHGraphEdge::Shortcut(shortcut) => self.check_shortcut(shortcut),
        }
    }

    fn check_shortcut(&self, shortcut: &Shortcut) -> Result<(), HierarchyError> {
        let invalid = |reason: String| HierarchyError::InvalidShortcut {
            shortcut: shortcut.id,
            reason,
        };

        // Skipped edges must already exist, which also rules out cycles between shortcuts
        if shortcut.incoming_edge >= shortcut.id || shortcut.outgoing_edge >= shortcut.id {
            return Err(invalid(format!(
                "skipped edges {} and {} must precede it",
                shortcut.incoming_edge, shortcut.outgoing_edge
            )));
        }

        let incoming = &self.edges[shortcut.incoming_edge];
        let outgoing = &self.edges[shortcut.outgoing_edge];

        if incoming.start_node() != shortcut.start || outgoing.end_node() != shortcut.end {
            return Err(invalid(String::from(
                "skipped edges do not share its endpoints",
            )));
        }

        let via = incoming.end_node();
        if via != outgoing.start_node() {
            return Err(invalid(String::from("skipped edges are not adjacent")));
        }

        if self.ranks[via] > self.ranks[shortcut.start] || self.ranks[via] > self.ranks[shortcut.end]
        {
            return Err(invalid(format!(
                "via node {} outranks an endpoint",
                via
            )));
        }

        if *incoming.costs() + *outgoing.costs() != shortcut.costs {
            return Err(invalid(String::from(
                "costs differ from the sum of the skipped edges",
            )));
        }

        Ok(())
    }
}
