use rayon::prelude::*;

use crate::{
    constants::{INFINITE_COST, INVALID_NODE},
    matrix::matrix_metrics::{Metric, MetricSet},
    types::NodeId,
    weighting::Cost,
};

/// Best costs from every source to every destination, for each requested metric.
///
/// Slots are laid out source-major so every source owns one contiguous chunk and sources can be
/// searched in parallel without locking. Reads go through [`MultiTreeEntries::entry`], which
/// presents the same data per destination.
#[derive(Debug, Clone)]
pub struct MultiTreeEntries {
    sources: usize,
    destinations: usize,
    metrics: MetricSet,
    stride: usize,
    costs: Vec<Cost>,
    parents: Vec<NodeId>,
}

impl MultiTreeEntries {
    pub fn new(sources: usize, destinations: usize, metrics: MetricSet) -> Self {
        let stride = metrics.len();
        let size = sources * destinations * stride;

        Self {
            sources,
            destinations,
            metrics,
            stride,
            costs: vec![INFINITE_COST; size],
            parents: vec![INVALID_NODE; size],
        }
    }

    pub fn entry(&self, destination: usize) -> MultiTreeEntry<'_> {
        debug_assert!(destination < self.destinations);
        MultiTreeEntry {
            entries: self,
            destination,
        }
    }

    fn index(&self, source: usize, destination: usize, slot: usize) -> usize {
        debug_assert!(source < self.sources);
        (source * self.destinations + destination) * self.stride + slot
    }

    fn chunk_size(&self) -> usize {
        (self.destinations * self.stride).max(1)
    }

    pub(crate) fn source_slots_mut(&mut self) -> impl Iterator<Item = SourceSlots<'_>> {
        let chunk_size = self.chunk_size();
        let stride = self.stride;

        self.costs
            .chunks_mut(chunk_size)
            .zip(self.parents.chunks_mut(chunk_size))
            .map(move |(costs, parents)| SourceSlots {
                costs,
                parents,
                stride,
            })
    }

    pub(crate) fn par_source_slots_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = SourceSlots<'_>> {
        let chunk_size = self.chunk_size();
        let stride = self.stride;

        self.costs
            .par_chunks_mut(chunk_size)
            .zip(self.parents.par_chunks_mut(chunk_size))
            .map(move |(costs, parents)| SourceSlots {
                costs,
                parents,
                stride,
            })
    }
}

/// The results of all sources for one destination.
#[derive(Clone, Copy)]
pub struct MultiTreeEntry<'a> {
    entries: &'a MultiTreeEntries,
    destination: usize,
}

impl MultiTreeEntry<'_> {
    /// Cost from `source` to this destination, `None` if unreached or not requested
    pub fn cost(&self, source: usize, metric: Metric) -> Option<Cost> {
        let slot = self.entries.metrics.slot(metric)?;
        let cost = self.entries.costs[self.entries.index(source, self.destination, slot)];
        (cost != INFINITE_COST).then_some(cost)
    }

    /// Node preceding this destination on the best path from `source` for `metric`
    pub fn parent(&self, source: usize, metric: Metric) -> Option<NodeId> {
        let slot = self.entries.metrics.slot(metric)?;
        let parent = self.entries.parents[self.entries.index(source, self.destination, slot)];
        (parent != INVALID_NODE).then_some(parent)
    }

    pub fn is_reached(&self, source: usize) -> bool {
        self.entries
            .metrics
            .iter()
            .any(|metric| self.cost(source, metric).is_some())
    }
}

/// Writable slots of a single source.
pub(crate) struct SourceSlots<'a> {
    costs: &'a mut [Cost],
    parents: &'a mut [NodeId],
    stride: usize,
}

impl SourceSlots<'_> {
    pub(crate) fn set(&mut self, destination: usize, slot: usize, cost: Cost, parent: NodeId) {
        let index = destination * self.stride + slot;
        self.costs[index] = cost;
        self.parents[index] = parent;
    }
}
