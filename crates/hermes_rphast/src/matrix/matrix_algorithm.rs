use crate::error::MatrixError;

use super::{matrix_request::MatrixRequest, matrix_result::MatrixResult};

pub trait MatrixAlgorithm {
    fn calc_matrix(&self, request: &MatrixRequest) -> Result<MatrixResult, MatrixError>;
}
