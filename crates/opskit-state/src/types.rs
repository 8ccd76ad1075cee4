//! Persisted record types.

use serde::{Deserialize, Serialize};

use opskit_logscan::ErrorSummary;

/// Unique row id in the error summary table.
pub type SummaryId = u64;

/// One stored error summary row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredErrorSummary {
    pub id: SummaryId,
    pub error_type: String,
    /// Timestamp of the latest occurrence, as written in the log.
    pub date: String,
    pub count: u64,
    /// Unix timestamp (seconds) when the row was written.
    pub recorded_at: u64,
}

impl StoredErrorSummary {
    pub fn from_summary(id: SummaryId, summary: &ErrorSummary, recorded_at: u64) -> Self {
        Self {
            id,
            error_type: summary.error_type.clone(),
            date: summary.last_seen.clone(),
            count: summary.count,
            recorded_at,
        }
    }
}

/// Total occurrences of one error type across all stored rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorTypeTotal {
    pub error_type: String,
    pub total: u64,
    /// Number of rows contributing to the total.
    pub runs: u64,
}
