use std::{
    collections::BinaryHeap,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use fxhash::{FxHashMap, FxHashSet, FxHasher64};
use parking_lot::Mutex;
use tracing::debug;

use crate::{
    constants::UNRANKED,
    error::{HierarchyError, MatrixError},
    graph::{GraphEdge, HierarchyGraph},
    matrix::{matrix_location::MatrixLocations, ranked_node::RankedNode},
    types::{EdgeId, NodeId},
};

const DEFAULT_CACHE_CAPACITY: usize = 64;

/// The part of the hierarchy that can lie on a downward path into one of the destinations.
///
/// Nodes are stored by descending rank: every edge goes from a lower local id to a higher one,
/// so a single pass in local id order settles the downward sweep.
#[derive(Debug, Default)]
pub struct SubGraph {
    destinations: Vec<NodeId>,

    nodes: Vec<NodeId>,
    local_ids: FxHashMap<NodeId, usize>,

    /// Downward edges into each local node, offsets into `in_tails`/`in_edges`
    first_in: Vec<usize>,
    in_tails: Vec<usize>,
    in_edges: Vec<EdgeId>,
}

impl SubGraph {
    pub fn empty() -> Self {
        Self {
            first_in: vec![0],
            ..Default::default()
        }
    }

    /// Destinations this subgraph was extracted for
    pub fn destinations(&self) -> &[NodeId] {
        &self.destinations
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.in_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.local_ids.contains_key(&node)
    }

    pub fn local_id(&self, node: NodeId) -> Option<usize> {
        self.local_ids.get(&node).copied()
    }

    pub fn node(&self, local_id: usize) -> NodeId {
        self.nodes[local_id]
    }

    /// `(tail local id, edge id)` of every downward edge ending at `local_id`
    pub fn incoming_edges(&self, local_id: usize) -> impl Iterator<Item = (usize, EdgeId)> + '_ {
        let range = self.first_in[local_id]..self.first_in[local_id + 1];
        self.in_tails[range.clone()]
            .iter()
            .copied()
            .zip(self.in_edges[range].iter().copied())
    }
}

pub struct SubGraphExtractor<'a, G>
where
    G: HierarchyGraph,
{
    graph: &'a G,
    cancellation: Option<&'a AtomicBool>,
}

impl<'a, G> SubGraphExtractor<'a, G>
where
    G: HierarchyGraph,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, cancellation: &'a AtomicBool) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Extracts the subgraph for the mapped destinations, unmapped ones are skipped
    pub fn extract_locations(&self, destinations: &MatrixLocations) -> Result<SubGraph, MatrixError> {
        self.extract(&destinations.valid_node_ids())
    }

    pub fn extract(&self, destinations: &[NodeId]) -> Result<SubGraph, MatrixError> {
        if destinations.is_empty() {
            return Ok(SubGraph::empty());
        }

        let mut heap = BinaryHeap::with_capacity(destinations.len());
        let mut discovered = FxHashSet::default();

        for &destination in destinations {
            let rank = self.checked_rank(destination)?;
            if discovered.insert(destination) {
                heap.push(RankedNode {
                    node_id: destination,
                    rank,
                });
            }
        }

        // Every discovered node outranks the node it was found from, so nodes come out of the
        // heap in strictly increasing rank.
        let mut ascending = Vec::with_capacity(discovered.len());
        while let Some(current) = heap.pop() {
            self.check_cancelled()?;

            for &edge_id in self.graph.downward_edges_into(current.node_id) {
                let tail = self.graph.edge(edge_id).start_node();
                let tail_rank = self.checked_rank(tail)?;

                if tail_rank <= current.rank {
                    return Err(HierarchyError::RankViolation {
                        edge: edge_id,
                        start: tail,
                        end: current.node_id,
                    }
                    .into());
                }

                if discovered.insert(tail) {
                    heap.push(RankedNode {
                        node_id: tail,
                        rank: tail_rank,
                    });
                }
            }

            ascending.push(current.node_id);
        }

        let subgraph = self.build(destinations, ascending);
        debug!(
            "Extracted subgraph with {} nodes and {} edges for {} destinations",
            subgraph.node_count(),
            subgraph.edge_count(),
            destinations.len()
        );

        Ok(subgraph)
    }

    fn build(&self, destinations: &[NodeId], mut nodes: Vec<NodeId>) -> SubGraph {
        nodes.reverse();

        let local_ids: FxHashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(local_id, &node)| (node, local_id))
            .collect();

        let mut first_in = Vec::with_capacity(nodes.len() + 1);
        let mut in_tails = Vec::new();
        let mut in_edges = Vec::new();
        first_in.push(0);

        for (local_id, &node) in nodes.iter().enumerate() {
            for &edge_id in self.graph.downward_edges_into(node) {
                let tail = local_ids[&self.graph.edge(edge_id).start_node()];
                debug_assert!(tail < local_id);

                in_tails.push(tail);
                in_edges.push(edge_id);
            }
            first_in.push(in_edges.len());
        }

        SubGraph {
            destinations: destinations.to_vec(),
            nodes,
            local_ids,
            first_in,
            in_tails,
            in_edges,
        }
    }

    fn checked_rank(&self, node: NodeId) -> Result<usize, MatrixError> {
        if node >= self.graph.node_count() {
            return Err(MatrixError::NodeOutOfBounds {
                node,
                node_count: self.graph.node_count(),
            });
        }

        match self.graph.node_rank(node) {
            UNRANKED => Err(HierarchyError::UnrankedNode(node).into()),
            rank => Ok(rank),
        }
    }

    fn check_cancelled(&self) -> Result<(), MatrixError> {
        match self.cancellation {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(MatrixError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Subgraphs of recent destination lists.
///
/// A subgraph is only handed out again for the exact same destination list it was extracted
/// for. Once full, the cache starts over empty.
pub struct SubGraphCache {
    entries: Mutex<FxHashMap<u64, Vec<Arc<SubGraph>>>>,
    capacity: usize,
}

impl Default for SubGraphCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl SubGraphCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
            capacity: capacity.max(1),
        }
    }

    fn key(destinations: &[NodeId]) -> u64 {
        let mut hasher = FxHasher64::default();
        destinations.hash(&mut hasher);
        hasher.finish()
    }

    pub fn get(&self, destinations: &[NodeId]) -> Option<Arc<SubGraph>> {
        self.entries
            .lock()
            .get(&Self::key(destinations))?
            .iter()
            .find(|subgraph| subgraph.destinations() == destinations)
            .cloned()
    }

    pub fn get_or_extract<F>(&self, destinations: &[NodeId], extract: F) -> Result<Arc<SubGraph>, MatrixError>
    where
        F: FnOnce() -> Result<SubGraph, MatrixError>,
    {
        if let Some(subgraph) = self.get(destinations) {
            debug!("Reusing cached subgraph for {} destinations", destinations.len());
            return Ok(subgraph);
        }

        // Extract without holding the lock, a concurrent duplicate only costs one extraction
        let subgraph = Arc::new(extract()?);

        let mut entries = self.entries.lock();
        if entries.len() >= self.capacity {
            entries.clear();
        }
        entries
            .entry(Self::key(destinations))
            .or_default()
            .push(subgraph.clone());

        Ok(subgraph)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
