use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Duration,
    Distance,
    Weight,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Duration, Metric::Distance, Metric::Weight];

    pub(crate) const COUNT: usize = 3;

    fn bit(self) -> u8 {
        match self {
            Metric::Duration => 1,
            Metric::Distance => 1 << 1,
            Metric::Weight => 1 << 2,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Duration => write!(f, "duration"),
            Metric::Distance => write!(f, "distance"),
            Metric::Weight => write!(f, "weight"),
        }
    }
}

/// Set of metrics requested for a matrix, always iterated in the order of [`Metric::ALL`].
///
/// Each requested metric owns a slot: its position among the requested metrics. Per-metric
/// storage is laid out by slot so unrequested metrics take no space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Metric>", into = "Vec<Metric>")]
pub struct MetricSet {
    bits: u8,
}

impl MetricSet {
    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn all() -> Self {
        Metric::ALL.into_iter().collect()
    }

    pub fn with(mut self, metric: Metric) -> Self {
        self.bits |= metric.bit();
        self
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.bits & metric.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL
            .into_iter()
            .filter(|&metric| self.contains(metric))
    }

    pub fn slot(&self, metric: Metric) -> Option<usize> {
        self.iter().position(|requested| requested == metric)
    }
}

impl From<Metric> for MetricSet {
    fn from(metric: Metric) -> Self {
        MetricSet::empty().with(metric)
    }
}

impl FromIterator<Metric> for MetricSet {
    fn from_iter<I: IntoIterator<Item = Metric>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MetricSet::empty(), |set, metric| set.with(metric))
    }
}

impl From<Vec<Metric>> for MetricSet {
    fn from(metrics: Vec<Metric>) -> Self {
        metrics.into_iter().collect()
    }
}

impl From<MetricSet> for Vec<Metric> {
    fn from(set: MetricSet) -> Self {
        set.iter().collect()
    }
}
