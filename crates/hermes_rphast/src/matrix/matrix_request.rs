use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    constants::DEFAULT_EMPTY_VALUE,
    error::MatrixError,
    matrix::{matrix_location::MatrixLocations, matrix_metrics::MetricSet},
};

const THREADS_ENV_VAR: &str = "HERMES_MATRIX_THREADS";
const EMPTY_VALUE_ENV_VAR: &str = "HERMES_MATRIX_EMPTY_VALUE";
const CACHE_SUBGRAPHS_ENV_VAR: &str = "HERMES_MATRIX_CACHE_SUBGRAPHS";

/// Unit of the distance table. Durations are always reported in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatrixUnits {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi")]
    Miles,
}

impl FromStr for MatrixUnits {
    type Err = MatrixError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "m" | "meters" => Ok(MatrixUnits::Meters),
            "km" | "kilometers" => Ok(MatrixUnits::Kilometers),
            "mi" | "miles" => Ok(MatrixUnits::Miles),
            _ => Err(MatrixError::InvalidUnits(value.to_string())),
        }
    }
}

impl fmt::Display for MatrixUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixUnits::Meters => write!(f, "m"),
            MatrixUnits::Kilometers => write!(f, "km"),
            MatrixUnits::Miles => write!(f, "mi"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixRequest {
    pub sources: MatrixLocations,
    pub destinations: MatrixLocations,
    pub metrics: MetricSet,
    #[serde(default)]
    pub units: MatrixUnits,
}

impl MatrixRequest {
    pub fn new(
        sources: MatrixLocations,
        destinations: MatrixLocations,
        metrics: MetricSet,
    ) -> Self {
        Self {
            sources,
            destinations,
            metrics,
            units: MatrixUnits::default(),
        }
    }

    pub fn with_units(mut self, units: MatrixUnits) -> Self {
        self.units = units;
        self
    }

    pub fn validate(&self) -> Result<(), MatrixError> {
        if self.metrics.is_empty() {
            return Err(MatrixError::NoMetrics);
        }

        if self.sources.is_empty() {
            return Err(MatrixError::EmptySources);
        }

        if self.destinations.is_empty() {
            return Err(MatrixError::EmptyDestinations);
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl FromStr for Threads {
    type Err = MatrixError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Ok(Threads::Auto),
            "single" | "1" => Ok(Threads::Single),
            other => other
                .parse::<usize>()
                .ok()
                .filter(|&num| num > 0)
                .map(Threads::Multi)
                .ok_or_else(|| MatrixError::InvalidConfig {
                    key: THREADS_ENV_VAR,
                    value: value.to_string(),
                }),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Sources are searched in parallel on this many threads
    pub threads: Threads,

    /// Value of every cell without a route
    pub empty_value: f64,

    /// Reuse subgraphs across requests with the same destinations
    pub cache_subgraphs: bool,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            threads: Threads::Auto,
            empty_value: DEFAULT_EMPTY_VALUE,
            cache_subgraphs: false,
        }
    }
}

impl MatrixConfig {
    pub fn from_env() -> Result<Self, MatrixError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, MatrixError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = MatrixConfig::default();

        if let Some(threads) = lookup(THREADS_ENV_VAR) {
            config.threads = threads.parse()?;
        }

        if let Some(empty_value) = lookup(EMPTY_VALUE_ENV_VAR) {
            config.empty_value =
                empty_value
                    .trim()
                    .parse()
                    .map_err(|_| MatrixError::InvalidConfig {
                        key: EMPTY_VALUE_ENV_VAR,
                        value: empty_value.clone(),
                    })?;
        }

        if let Some(cache) = lookup(CACHE_SUBGRAPHS_ENV_VAR) {
            config.cache_subgraphs =
                cache
                    .trim()
                    .parse()
                    .map_err(|_| MatrixError::InvalidConfig {
                        key: CACHE_SUBGRAPHS_ENV_VAR,
                        value: cache.clone(),
                    })?;
        }

        Ok(config)
    }
}
