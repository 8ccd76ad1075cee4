//! Per-error-type summaries.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::error::LogScanError;
use crate::parse::{LogEntry, parse_line};

/// Occurrences of one error type in a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub error_type: String,
    /// Timestamp of the most recent occurrence.
    pub last_seen: String,
    pub count: u64,
}

/// Accumulates error entries, keeping first-appearance order.
#[derive(Debug, Default)]
pub struct ErrorSummaryBuilder {
    summaries: Vec<ErrorSummary>,
    index: HashMap<String, usize>,
}

impl ErrorSummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: LogEntry) {
        match self.index.get(&entry.error_type).copied() {
            Some(i) => {
                let summary = &mut self.summaries[i];
                summary.count += 1;
                summary.last_seen = entry.timestamp;
            }
            None => {
                self.index
                    .insert(entry.error_type.clone(), self.summaries.len());
                self.summaries.push(ErrorSummary {
                    error_type: entry.error_type,
                    last_seen: entry.timestamp,
                    count: 1,
                });
            }
        }
    }

    /// Parse a raw line and record it if it is an error line.
    pub fn record_line(&mut self, line: &str) -> bool {
        match parse_line(line) {
            Some(entry) => {
                debug!(error_type = %entry.error_type, "error line");
                self.record(entry);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn finish(self) -> Vec<ErrorSummary> {
        self.summaries
    }
}

/// Summarize an iterator of log lines.
pub fn summarize_lines<'a, I>(lines: I) -> Vec<ErrorSummary>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = ErrorSummaryBuilder::new();
    for line in lines {
        builder.record_line(line);
    }
    builder.finish()
}

/// Summarize a log file, streaming it line by line.
pub fn summarize_file(path: &Path) -> Result<Vec<ErrorSummary>, LogScanError> {
    let file = File::open(path).map_err(|source| LogScanError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut builder = ErrorSummaryBuilder::new();
    let mut error_lines = 0usize;
    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| LogScanError::Read {
            path: path.to_path_buf(),
            line: n + 1,
            source,
        })?;
        if builder.record_line(&line) {
            error_lines += 1;
        }
    }

    let summaries = builder.finish();
    info!(
        ?path,
        error_lines,
        error_types = summaries.len(),
        "log summarized"
    );
    Ok(summaries)
}

/// Render summaries as a JSON object keyed by error type.
pub fn to_json_object(summaries: &[ErrorSummary]) -> Value {
    let map: Map<String, Value> = summaries
        .iter()
        .map(|s| {
            (
                s.error_type.clone(),
                json!({ "last_seen": s.last_seen, "count": s.count }),
            )
        })
        .collect();
    Value::Object(map)
}
