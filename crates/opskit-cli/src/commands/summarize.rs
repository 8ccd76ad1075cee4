use std::path::Path;

use anyhow::Context;
use opskit_logscan::{ErrorSummary, summarize_file, to_json_object};
use opskit_state::StateStore;
use tracing::info;

pub fn summarize(log: &Path, db: Option<&Path>, format: &str) -> anyhow::Result<()> {
    let summaries = summarize_file(log)?;

    match format {
        "text" => print!("{}", format_summaries(&summaries)),
        _ => println!("{}", serde_json::to_string_pretty(&to_json_object(&summaries))?),
    }

    if let Some(db) = db {
        let store = StateStore::open(db)
            .with_context(|| format!("failed to open database {}", db.display()))?;
        let ids = store.save_error_summaries(&summaries)?;
        info!(db = %db.display(), rows = ids.len(), "summary saved");
    }

    Ok(())
}

pub fn list(db: &Path, totals: bool) -> anyhow::Result<()> {
    let store = StateStore::open_existing(db)?;

    if totals {
        for total in store.error_type_totals()? {
            println!("{:<30} {:>8}  ({} runs)", total.error_type, total.total, total.runs);
        }
    } else {
        for row in store.list_error_summaries()? {
            println!("{:>5}  {:<20}  {:<30} {:>8}", row.id, row.date, row.error_type, row.count);
        }
    }
    Ok(())
}

fn format_summaries(summaries: &[ErrorSummary]) -> String {
    if summaries.is_empty() {
        return "No errors found.\n".to_string();
    }
    summaries
        .iter()
        .map(|s| format!("{:<30} {:>8}  last seen {}\n", s.error_type, s.count, s.last_seen))
        .collect()
}
