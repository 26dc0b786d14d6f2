pub mod matrix_algorithm;
pub mod matrix_location;
pub mod matrix_metrics;
pub mod matrix_request;
pub mod matrix_result;
pub mod multi_tree_metrics_extractor;
pub(crate) mod ranked_node;
pub mod rphast;
pub mod rphast_matrix_algorithm;
