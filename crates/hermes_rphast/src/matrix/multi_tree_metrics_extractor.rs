use crate::{
    constants::MILLISECONDS_IN_SECOND,
    distance::{Distance, Kilometers, Meters, Miles},
    weighting::Cost,
};

use super::{
    matrix_location::MatrixLocations,
    matrix_metrics::{Metric, MetricSet},
    matrix_request::MatrixUnits,
    matrix_result::MatrixTables,
    rphast::multi_tree::MultiTreeEntries,
};

/// Turns raw multi-tree costs into matrix tables over the full source and destination lists.
pub struct MultiTreeMetricsExtractor {
    metrics: MetricSet,
    units: MatrixUnits,
    empty_value: f64,
}

impl MultiTreeMetricsExtractor {
    pub fn new(metrics: MetricSet, units: MatrixUnits, empty_value: f64) -> Self {
        Self {
            metrics,
            units,
            empty_value,
        }
    }

    /// Tables where every cell holds the empty value
    pub fn empty_tables(&self, sources: usize, destinations: usize) -> MatrixTables {
        MatrixTables::new(self.metrics, sources * destinations, self.empty_value)
    }

    /// `entries` covers the mapped sources and destinations only, in their original order.
    /// Cells of unmapped locations and of unreached pairs get the empty value.
    pub fn calc_values(
        &self,
        entries: &MultiTreeEntries,
        sources: &MatrixLocations,
        destinations: &MatrixLocations,
    ) -> MatrixTables {
        let source_positions = sources.valid_positions();
        let destination_positions = destinations.valid_positions();

        let mut tables = MatrixTables::default();
        for metric in self.metrics.iter() {
            let table: Vec<f64> = source_positions
                .iter()
                .flat_map(|&source| {
                    destination_positions.iter().map(move |&destination| {
                        match (source, destination) {
                            (Some(source), Some(destination)) => entries
                                .entry(destination)
                                .cost(source, metric)
                                .map_or(self.empty_value, |cost| self.convert(cost, metric)),
                            _ => self.empty_value,
                        }
                    })
                })
                .collect();

            match metric {
                Metric::Duration => tables.durations = Some(table),
                Metric::Distance => tables.distances = Some(table),
                Metric::Weight => tables.weights = Some(table),
            }
        }

        tables
    }

    fn convert(&self, cost: Cost, metric: Metric) -> f64 {
        match metric {
            Metric::Duration => cost as f64 / MILLISECONDS_IN_SECOND,
            Metric::Distance => {
                let distance = Distance::<Meters>::from_nanometers(cost as i64);
                match self.units {
                    MatrixUnits::Meters => distance.value(),
                    MatrixUnits::Kilometers => distance.convert::<Kilometers>().value(),
                    MatrixUnits::Miles => distance.convert::<Miles>().value(),
                }
            }
            Metric::Weight => cost as f64,
        }
    }
}
