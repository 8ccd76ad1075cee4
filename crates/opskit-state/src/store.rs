//! StateStore — redb-backed persistence for error summaries.
//!
//! Rows are JSON-serialized into the `&[u8]` value column of a single
//! table. `open` is for writers and creates the file; readers use
//! `open_existing`, which never creates anything.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use opskit_logscan::ErrorSummary;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Error summary store, cheap to clone and shareable across threads.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open the database at `path`, creating the file if needed.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(|e| open_error(path, e))?;
        Self::with_database(db, path)
    }

    /// Open a database that must already exist.
    pub fn open_existing(path: &Path) -> StateResult<Self> {
        if !path.is_file() {
            return Err(StateError::Missing(path.to_path_buf()));
        }
        let db = Database::open(path).map_err(|e| open_error(path, e))?;
        Self::with_database(db, path)
    }

    /// Ephemeral store for tests.
    pub fn open_in_memory() -> StateResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| open_error(Path::new(":memory:"), e))?;
        Self::with_database(db, Path::new(":memory:"))
    }

    fn with_database(db: Database, path: &Path) -> StateResult<Self> {
        let store = Self { db: Arc::new(db) };
        // A file written by an older build may predate the table.
        let txn = store.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(ERROR_SUMMARY).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(?path, "summary store opened");
        Ok(store)
    }

    /// Append one row per summary in a single transaction.
    ///
    /// Ids continue from the highest id already stored. Returns the ids
    /// assigned, in input order.
    pub fn save_error_summaries(&self, summaries: &[ErrorSummary]) -> StateResult<Vec<SummaryId>> {
        let recorded_at = epoch_secs();
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let mut ids = Vec::with_capacity(summaries.len());
        {
            let mut table = txn.open_table(ERROR_SUMMARY).map_err(map_err!(Table))?;
            let mut next_id = match table.last().map_err(map_err!(Read))? {
                Some((key, _)) => key.value() + 1,
                None => 1,
            };
            for summary in summaries {
                let row = StoredErrorSummary::from_summary(next_id, summary, recorded_at);
                let value = serde_json::to_vec(&row).map_err(map_err!(Serialize))?;
                table
                    .insert(next_id, value.as_slice())
                    .map_err(map_err!(Write))?;
                ids.push(next_id);
                next_id += 1;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(rows = ids.len(), "error summaries stored");
        Ok(ids)
    }

    /// Get a stored row by id.
    pub fn get_error_summary(&self, id: SummaryId) -> StateResult<Option<StoredErrorSummary>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(ERROR_SUMMARY).map_err(map_err!(Table))?;
        match table.get(id).map_err(map_err!(Read))? {
            Some(guard) => {
                let row: StoredErrorSummary =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    /// List all stored rows in id order.
    pub fn list_error_summaries(&self) -> StateResult<Vec<StoredErrorSummary>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(ERROR_SUMMARY).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let row: StoredErrorSummary =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(row);
        }
        Ok(results)
    }

    /// Sum counts per error type across every stored row, sorted by type.
    pub fn error_type_totals(&self) -> StateResult<Vec<ErrorTypeTotal>> {
        let mut totals: BTreeMap<String, (u64, u64)> = BTreeMap::new();
        for row in self.list_error_summaries()? {
            let entry = totals.entry(row.error_type).or_default();
            entry.0 += row.count;
            entry.1 += 1;
        }
        Ok(totals
            .into_iter()
            .map(|(error_type, (total, runs))| ErrorTypeTotal {
                error_type,
                total,
                runs,
            })
            .collect())
    }
}

fn open_error(path: &Path, e: impl std::fmt::Display) -> StateError {
    StateError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
