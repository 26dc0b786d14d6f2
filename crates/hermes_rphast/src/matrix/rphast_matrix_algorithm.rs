use std::sync::{Arc, atomic::AtomicBool};

use tracing::{info, warn};

use crate::{
    error::MatrixError,
    graph::HierarchyGraph,
    stopwatch::Stopwatch,
    types::NodeId,
    weighting::Weighting,
};

use super::{
    matrix_algorithm::MatrixAlgorithm,
    matrix_location::{MatrixLocation, MatrixLocations},
    matrix_request::{MatrixConfig, MatrixRequest},
    matrix_result::{MatrixResult, MatrixStatistics, MatrixTables},
    multi_tree_metrics_extractor::MultiTreeMetricsExtractor,
    rphast::{
        rphast_search::RPHASTSearch,
        subgraph::{SubGraph, SubGraphCache, SubGraphExtractor},
    },
};

/// Many-to-many matrices over a contraction hierarchy.
///
/// The destinations select a subgraph of the hierarchy once per request, every source then only
/// needs its own upward search plus one sweep over that subgraph.
pub struct RPHASTMatrixAlgorithm<'a, G, W>
where
    G: HierarchyGraph,
    W: Weighting<G>,
{
    graph: &'a G,
    weighting: &'a W,
    config: MatrixConfig,
    cache: Option<SubGraphCache>,
    cancellation: Option<Arc<AtomicBool>>,
}

impl<'a, G, W> RPHASTMatrixAlgorithm<'a, G, W>
where
    G: HierarchyGraph,
    W: Weighting<G>,
{
    pub fn new(graph: &'a G, weighting: &'a W, config: MatrixConfig) -> Self {
        Self {
            graph,
            weighting,
            cache: config.cache_subgraphs.then(SubGraphCache::default),
            config,
            cancellation: None,
        }
    }

    /// Raising the flag aborts running and future computations with [`MatrixError::Cancelled`]
    pub fn with_cancellation(mut self, cancellation: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    pub fn compute(&self, request: &MatrixRequest) -> Result<MatrixResult, MatrixError> {
        request.validate()?;
        self.check_locations(&request.sources)?;
        self.check_locations(&request.destinations)?;

        let stopwatch = Stopwatch::new("rphast_matrix");
        let extractor = MultiTreeMetricsExtractor::new(
            request.metrics,
            request.units,
            self.config.empty_value,
        );

        let unmapped = request.sources.unmapped_count() + request.destinations.unmapped_count();
        if unmapped > 0 {
            warn!("{} locations are not mapped onto the graph", unmapped);
        }

        let (tables, mut statistics) =
            if request.sources.has_valid_nodes() && request.destinations.has_valid_nodes() {
                self.search(request, &extractor)?
            } else {
                warn!("No mapped sources or destinations, the matrix is empty");
                (
                    extractor.empty_tables(request.sources.len(), request.destinations.len()),
                    MatrixStatistics::default(),
                )
            };

        statistics.duration = stopwatch.elapsed();

        info!(
            "Computed {}x{} matrix in {:?}, {} subgraph nodes, {} visited nodes",
            request.sources.len(),
            request.destinations.len(),
            statistics.duration,
            statistics.subgraph_nodes,
            statistics.visited_nodes
        );

        Ok(MatrixResult::new(
            request.sources.clone(),
            request.destinations.clone(),
            request.metrics,
            request.units,
            tables,
            statistics,
        ))
    }

    fn search(
        &self,
        request: &MatrixRequest,
        extractor: &MultiTreeMetricsExtractor,
    ) -> Result<(MatrixTables, MatrixStatistics), MatrixError> {
        let sources = request.sources.valid_node_ids();
        let destinations = request.destinations.valid_node_ids();

        let subgraph = self.subgraph(&destinations)?;

        let mut search =
            RPHASTSearch::new(self.graph, self.weighting).with_threads(self.config.threads.clone());
        if let Some(cancellation) = &self.cancellation {
            search = search.with_cancellation(cancellation.clone());
        }
        search.prepare(subgraph.clone());

        let result = search.compute(&sources, &destinations, request.metrics)?;
        let tables = extractor.calc_values(&result.entries, &request.sources, &request.destinations);

        let statistics = MatrixStatistics {
            visited_nodes: result.visited_nodes,
            subgraph_nodes: subgraph.node_count(),
            subgraph_edges: subgraph.edge_count(),
            ..Default::default()
        };

        Ok((tables, statistics))
    }

    fn subgraph(&self, destinations: &[NodeId]) -> Result<Arc<SubGraph>, MatrixError> {
        let mut extractor = SubGraphExtractor::new(self.graph);
        if let Some(cancellation) = &self.cancellation {
            extractor = extractor.with_cancellation(cancellation);
        }

        match &self.cache {
            Some(cache) => cache.get_or_extract(destinations, || extractor.extract(destinations)),
            None => extractor.extract(destinations).map(Arc::new),
        }
    }

    fn check_locations(&self, locations: &MatrixLocations) -> Result<(), MatrixError> {
        let node_count = self.graph.node_count();

        for location in locations.iter() {
            if let MatrixLocation::Mapped(node) = *location
                && node >= node_count
            {
                return Err(MatrixError::NodeOutOfBounds { node, node_count });
            }
        }

        Ok(())
    }
}

impl<G, W> MatrixAlgorithm for RPHASTMatrixAlgorithm<'_, G, W>
where
    G: HierarchyGraph,
    W: Weighting<G>,
{
    fn calc_matrix(&self, request: &MatrixRequest) -> Result<MatrixResult, MatrixError> {
        self.compute(request)
    }
}
