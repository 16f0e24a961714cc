//! Crate-level error type.

use crate::preprocessing::PreprocessingError;
use thiserror::Error;

/// Errors surfaced by loading, training, and evaluation.
#[derive(Debug, Error)]
pub enum FareError {
    /// Unusable input data: missing or unparseable fields, empty inputs.
    #[error("data error: {0}")]
    Data(String),

    /// An operation that needs a fitted pipeline ran before `run`.
    #[error("pipeline is not fitted: call run() before {0}")]
    NotFitted(&'static str),

    /// Paired inputs of unequal length.
    #[error("shape mismatch: {context} ({left} vs {right})")]
    ShapeMismatch {
        context: &'static str,
        left: usize,
        right: usize,
    },

    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),

    /// The linear solver could not produce usable weights.
    #[error("solver error: {0}")]
    Solver(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience alias used across the crate.
pub type Result<T, E = FareError> = std::result::Result<T, E>;
