//! opskit-logscan — server log error summaries.
//!
//! Scans a plain-text server log for `ERROR` lines of the form
//!
//! ```text
//! 2024-09-18 12:35:22 ERROR ConnectionTimeout: Connection to database failed
//! ```
//!
//! and counts occurrences per error type, remembering the timestamp of the
//! most recent occurrence.

pub mod error;
pub mod parse;
pub mod summary;

pub use error::LogScanError;
pub use parse::{LogEntry, parse_line};
pub use summary::{ErrorSummary, ErrorSummaryBuilder, summarize_file, summarize_lines, to_json_object};
