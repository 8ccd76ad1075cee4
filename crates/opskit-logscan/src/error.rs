use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogScanError {
    #[error("failed to open log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read log {path} at line {line}: {source}")]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },
}
