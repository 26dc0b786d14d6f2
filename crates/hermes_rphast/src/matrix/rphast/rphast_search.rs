use std::{
    collections::BinaryHeap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use fxhash::FxHashMap;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    constants::{INFINITE_COST, INVALID_NODE, UNRANKED},
    error::{HierarchyError, MatrixError},
    graph::{GraphEdge, HierarchyGraph},
    matrix::{
        matrix_metrics::{Metric, MetricSet},
        matrix_request::Threads,
        ranked_node::RankedNode,
    },
    stopwatch::Stopwatch,
    types::{EdgeId, NodeId},
    weighting::{Cost, Weighting},
};

use super::{
    multi_tree::{MultiTreeEntries, SourceSlots},
    subgraph::SubGraph,
};

/// Best known cost and predecessor of a node, one slot per requested metric.
#[derive(Debug, Clone, Copy)]
struct NodeLabel {
    costs: [Cost; Metric::COUNT],
    parents: [NodeId; Metric::COUNT],
}

impl NodeLabel {
    const UNREACHED: NodeLabel = NodeLabel {
        costs: [INFINITE_COST; Metric::COUNT],
        parents: [INVALID_NODE; Metric::COUNT],
    };

    fn source() -> Self {
        NodeLabel {
            costs: [0; Metric::COUNT],
            parents: [INVALID_NODE; Metric::COUNT],
        }
    }
}

pub struct RPHASTSearchResult {
    pub entries: MultiTreeEntries,

    /// Nodes settled by the upward phase over all sources
    pub visited_nodes: usize,
}

/// Runs one upward search per source over the whole hierarchy, then sweeps the prepared
/// subgraph downwards to carry the costs to the destinations.
pub struct RPHASTSearch<'a, G, W>
where
    G: HierarchyGraph,
    W: Weighting<G>,
{
    graph: &'a G,
    weighting: &'a W,
    subgraph: Option<Arc<SubGraph>>,
    cancellation: Option<Arc<AtomicBool>>,
    threads: Threads,
}

impl<'a, G, W> RPHASTSearch<'a, G, W>
where
    G: HierarchyGraph,
    W: Weighting<G>,
{
    pub fn new(graph: &'a G, weighting: &'a W) -> Self {
        Self {
            graph,
            weighting,
            subgraph: None,
            cancellation: None,
            threads: Threads::Single,
        }
    }

    pub fn with_threads(mut self, threads: Threads) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_cancellation(mut self, cancellation: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Every following [`RPHASTSearch::compute`] targets the destinations of this subgraph
    pub fn prepare(&mut self, subgraph: Arc<SubGraph>) {
        self.subgraph = Some(subgraph);
    }

    pub fn compute(
        &self,
        sources: &[NodeId],
        destinations: &[NodeId],
        metrics: MetricSet,
    ) -> Result<RPHASTSearchResult, MatrixError> {
        let subgraph = self.subgraph.as_deref().ok_or(MatrixError::NotPrepared)?;

        for &source in sources {
            self.check_node(source)?;
        }

        let local_destinations = destinations
            .iter()
            .map(|&destination| {
                subgraph
                    .local_id(destination)
                    .ok_or(MatrixError::DestinationNotInSubGraph(destination))
            })
            .collect::<Result<Vec<usize>, MatrixError>>()?;

        let metrics_by_slot: Vec<Metric> = metrics.iter().collect();
        let mut entries = MultiTreeEntries::new(sources.len(), destinations.len(), metrics);

        // Nothing to reach
        if subgraph.is_empty() || destinations.is_empty() {
            return Ok(RPHASTSearchResult {
                entries,
                visited_nodes: 0,
            });
        }

        let stopwatch = Stopwatch::new("rphast_search");

        let visited_nodes = match self.threads {
            Threads::Single => entries
                .source_slots_mut()
                .zip(sources)
                .map(|(slots, &source)| {
                    self.search_source(subgraph, source, &local_destinations, &metrics_by_slot, slots)
                })
                .sum::<Result<usize, MatrixError>>()?,
            _ => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(self.threads.number_of_threads())
                    .build()?;

                pool.install(|| {
                    entries
                        .par_source_slots_mut()
                        .zip(sources.par_iter())
                        .map(|(slots, &source)| {
                            self.search_source(
                                subgraph,
                                source,
                                &local_destinations,
                                &metrics_by_slot,
                                slots,
                            )
                        })
                        .try_reduce(|| 0, |a, b| Ok(a + b))
                })?
            }
        };

        stopwatch.report();
        debug!(
            "Searched {} sources into {} destinations, settled {} nodes upwards",
            sources.len(),
            destinations.len(),
            visited_nodes
        );

        Ok(RPHASTSearchResult {
            entries,
            visited_nodes,
        })
    }

    fn search_source(
        &self,
        subgraph: &SubGraph,
        source: NodeId,
        local_destinations: &[usize],
        metrics: &[Metric],
        mut slots: SourceSlots<'_>,
    ) -> Result<usize, MatrixError> {
        let (upward_labels, visited_nodes) = self.upward_search(source, metrics)?;

        let mut labels = vec![NodeLabel::UNREACHED; subgraph.node_count()];
        for (node, label) in upward_labels {
            if let Some(local_id) = subgraph.local_id(node) {
                labels[local_id] = label;
            }
        }

        // Tails always come before their heads, so each node is final once its turn comes
        for local_id in 0..subgraph.node_count() {
            self.check_cancelled()?;

            let (settled, rest) = labels.split_at_mut(local_id);
            let label = &mut rest[0];

            for (tail, edge_id) in subgraph.incoming_edges(local_id) {
                let tail_label = &settled[tail];
                self.relax(tail_label, subgraph.node(tail), label, edge_id, metrics);
            }
        }

        for (destination, &local_id) in local_destinations.iter().enumerate() {
            let label = &labels[local_id];
            for slot in 0..metrics.len() {
                if label.costs[slot] != INFINITE_COST {
                    slots.set(destination, slot, label.costs[slot], label.parents[slot]);
                }
            }
        }

        Ok(visited_nodes)
    }

    /// Settles nodes by increasing rank. Upward edges always lead to a higher rank, so every
    /// node is settled after all of its upward predecessors and its label is final, for all
    /// metrics at once.
    fn upward_search(
        &self,
        source: NodeId,
        metrics: &[Metric],
    ) -> Result<(FxHashMap<NodeId, NodeLabel>, usize), MatrixError> {
        let mut labels: FxHashMap<NodeId, NodeLabel> = FxHashMap::default();
        let mut heap = BinaryHeap::new();
        let mut visited_nodes = 0;

        labels.insert(source, NodeLabel::source());
        heap.push(RankedNode {
            node_id: source,
            rank: self.checked_rank(source)?,
        });

        while let Some(RankedNode { node_id, rank }) = heap.pop() {
            self.check_cancelled()?;
            visited_nodes += 1;

            let label = labels[&node_id];

            for &edge_id in self.graph.upward_edges(node_id) {
                let head = self.graph.edge(edge_id).end_node();
                let head_rank = self.checked_rank(head)?;

                if head_rank <= rank {
                    return Err(HierarchyError::RankViolation {
                        edge: edge_id,
                        start: node_id,
                        end: head,
                    }
                    .into());
                }

                let head_label = labels.entry(head).or_insert_with(|| {
                    heap.push(RankedNode {
                        node_id: head,
                        rank: head_rank,
                    });
                    NodeLabel::UNREACHED
                });

                self.relax(&label, node_id, head_label, edge_id, metrics);
            }
        }

        Ok((labels, visited_nodes))
    }

    fn relax(
        &self,
        from: &NodeLabel,
        from_node: NodeId,
        to: &mut NodeLabel,
        edge_id: EdgeId,
        metrics: &[Metric],
    ) {
        let edge = self.graph.edge(edge_id);

        for (slot, &metric) in metrics.iter().enumerate() {
            if from.costs[slot] == INFINITE_COST {
                continue;
            }

            let cost = from.costs[slot].saturating_add(self.weighting.calc_edge_cost(edge, metric));
            if cost < to.costs[slot] {
                to.costs[slot] = cost;
                to.parents[slot] = from_node;
            }
        }
    }

    fn check_node(&self, node: NodeId) -> Result<(), MatrixError> {
        if node >= self.graph.node_count() {
            return Err(MatrixError::NodeOutOfBounds {
                node,
                node_count: self.graph.node_count(),
            });
        }
        Ok(())
    }

    fn checked_rank(&self, node: NodeId) -> Result<usize, MatrixError> {
        match self.graph.node_rank(node) {
            UNRANKED => Err(HierarchyError::UnrankedNode(node).into()),
            rank => Ok(rank),
        }
    }

    fn check_cancelled(&self) -> Result<(), MatrixError> {
        match &self.cancellation {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(MatrixError::Cancelled),
            _ => Ok(()),
        }
    }
}
