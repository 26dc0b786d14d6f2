pub mod ch_edge;
pub mod ch_storage;
pub mod ch_weighting;
pub mod shortcut;
