use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{
    matrix_location::MatrixLocations,
    matrix_metrics::{Metric, MetricSet},
    matrix_request::MatrixUnits,
};

/// Dense row-major tables, one per requested metric, indexed
/// `source_index * destinations + destination_index`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct MatrixTables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durations: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distances: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

impl MatrixTables {
    /// Allocates a table for each requested metric only
    pub fn new(metrics: MetricSet, size: usize, fill: f64) -> Self {
        let table = |metric| metrics.contains(metric).then(|| vec![fill; size]);

        Self {
            durations: table(Metric::Duration),
            distances: table(Metric::Distance),
            weights: table(Metric::Weight),
        }
    }

    pub fn table(&self, metric: Metric) -> Option<&[f64]> {
        match metric {
            Metric::Duration => self.durations.as_deref(),
            Metric::Distance => self.distances.as_deref(),
            Metric::Weight => self.weights.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixStatistics {
    /// Nodes settled by all upward searches together
    pub visited_nodes: usize,
    pub subgraph_nodes: usize,
    pub subgraph_edges: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct MatrixResult {
    sources: MatrixLocations,
    destinations: MatrixLocations,
    metrics: MetricSet,
    units: MatrixUnits,
    tables: MatrixTables,
    statistics: MatrixStatistics,
}

impl MatrixResult {
    pub(crate) fn new(
        sources: MatrixLocations,
        destinations: MatrixLocations,
        metrics: MetricSet,
        units: MatrixUnits,
        tables: MatrixTables,
        statistics: MatrixStatistics,
    ) -> Self {
        Self {
            sources,
            destinations,
            metrics,
            units,
            tables,
            statistics,
        }
    }

    pub fn sources(&self) -> &MatrixLocations {
        &self.sources
    }

    pub fn destinations(&self) -> &MatrixLocations {
        &self.destinations
    }

    /// Metrics that have a table in this result
    pub fn metrics(&self) -> MetricSet {
        self.metrics
    }

    pub fn units(&self) -> MatrixUnits {
        self.units
    }

    pub fn table(&self, metric: Metric) -> Option<&[f64]> {
        self.tables.table(metric)
    }

    pub fn tables(&self) -> &MatrixTables {
        &self.tables
    }

    pub fn into_tables(self) -> MatrixTables {
        self.tables
    }

    /// `None` if the metric was not requested or either index is outside the matrix
    pub fn value(&self, source_index: usize, destination_index: usize, metric: Metric) -> Option<f64> {
        if source_index >= self.sources.len() || destination_index >= self.destinations.len() {
            return None;
        }

        self.table(metric)?
            .get(source_index * self.destinations.len() + destination_index)
            .copied()
    }

    pub fn statistics(&self) -> &MatrixStatistics {
        &self.statistics
    }
}
