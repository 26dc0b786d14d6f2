use crate::weighting::{Cost, Weight};

pub const INVALID_NODE: usize = usize::MAX;
pub const UNRANKED: usize = usize::MAX;

pub(crate) const MAX_WEIGHT: Weight = u32::MAX;

/// Cost of a node or matrix slot that has not been reached
pub const INFINITE_COST: Cost = u64::MAX;

/// Written into every matrix cell that has no route, unless configured otherwise
pub const DEFAULT_EMPTY_VALUE: f64 = -1.0;

pub(crate) const MILLISECONDS_IN_SECOND: f64 = 1000.0;

/// Bumped whenever the layout of a persisted hierarchy changes
pub(crate) const CH_STORAGE_VERSION: u32 = 1;
