//! redb table definitions.

use redb::TableDefinition;

/// Error summary rows keyed by auto-incremented id.
pub const ERROR_SUMMARY: TableDefinition<u64, &[u8]> = TableDefinition::new("error_summary");
