//! Log line parsing.

use serde::{Deserialize, Serialize};

/// Marker that identifies an error line.
pub const ERROR_MARKER: &str = "ERROR";

/// Error type used when an ERROR line carries no name before the colon.
pub const UNKNOWN_ERROR_TYPE: &str = "Unknown";

/// A single parsed error line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Everything before the marker, trimmed.
    pub timestamp: String,
    /// Name between the marker and the first colon, whitespace removed.
    pub error_type: String,
}

/// Parse a log line. Returns `None` for lines without the `ERROR` marker.
pub fn parse_line(line: &str) -> Option<LogEntry> {
    let (before, after) = line.split_once(ERROR_MARKER)?;

    let segment = after.split(ERROR_MARKER).next().unwrap_or_default();
    let name = segment.split(':').next().unwrap_or_default();
    let error_type: String = name.chars().filter(|c| !c.is_whitespace()).collect();

    Some(LogEntry {
        timestamp: before.trim().to_string(),
        error_type: if error_type.is_empty() {
            UNKNOWN_ERROR_TYPE.to_string()
        } else {
            error_type
        },
    })
}
