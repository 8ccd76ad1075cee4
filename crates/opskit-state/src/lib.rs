//! opskit-state — embedded store for log error summaries.
//!
//! Backed by [redb](https://docs.rs/redb). Each summarizer run appends one
//! row per error type; rows are keyed by an auto-incremented `u64` id and
//! hold the JSON-serialized record.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`).

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::StateStore;
pub use types::*;
