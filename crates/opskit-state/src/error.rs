//! Error types for the error summary store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for state store operations.
pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open summary database {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("summary database {0} does not exist")]
    Missing(PathBuf),

    #[error("summary transaction failed: {0}")]
    Transaction(String),

    #[error("cannot open error_summary table: {0}")]
    Table(String),

    #[error("failed to read summary rows: {0}")]
    Read(String),

    #[error("failed to write summary row: {0}")]
    Write(String),

    #[error("cannot encode summary row: {0}")]
    Serialize(String),

    #[error("corrupt summary row: {0}")]
    Deserialize(String),
}
