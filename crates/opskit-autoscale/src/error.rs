//! Error types for scaling decisions.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for scaling operations.
pub type ScalingResult<T> = Result<T, ScalingError>;

#[derive(Debug, Error)]
pub enum ScalingError {
    #[error("insufficient data: need {required} samples, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid scaling policy: {0}")]
    InvalidPolicy(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
