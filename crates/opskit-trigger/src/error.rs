//! Error types for the storage trigger.

use thiserror::Error;

/// The notification itself could not be interpreted.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("event has no records")]
    NoRecords,

    #[error("object key is not valid percent-encoded UTF-8: {0}")]
    InvalidKey(String),
}

/// An object lookup failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket {0} does not exist")]
    NoSuchBucket(String),

    #[error("object {key} not found in bucket {bucket}")]
    NoSuchKey { bucket: String, key: String },

    #[error("key {0} escapes its bucket")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
