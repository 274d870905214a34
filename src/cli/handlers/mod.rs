//! Command handlers for the CLI.

mod config;
mod import;
mod journals;
mod list;
mod records;
mod scan;

use std::path::Path;

use anyhow::{Context, Result};

use crate::db::Database;
use crate::domain::JournalKey;
use crate::store::ScanError;

pub use config::handle_settings;
pub use import::handle_import;
pub use journals::{handle_journal_add, handle_journal_rm, handle_journals};
pub use list::handle_list;
pub use records::{handle_retag, handle_rm};
pub use scan::handle_scan;

/// Opens the collection, printing per-file scan failures to stderr.
pub(crate) fn open_collection(root: &Path) -> Result<Database> {
    let (db, errors) = Database::open(root)
        .with_context(|| format!("failed to open collection at {}", root.display()))?;
    report_scan_errors(&errors);
    Ok(db)
}

pub(crate) fn report_scan_errors(errors: &[ScanError]) {
    for error in errors {
        eprintln!("  skipped: {}", error);
    }
}

/// Parses journal key arguments and checks each one is actually known.
pub(crate) fn resolve_journals(db: &Database, raw: &[String]) -> Result<Vec<JournalKey>> {
    raw.iter()
        .map(|arg| {
            let key: JournalKey = arg
                .parse()
                .with_context(|| format!("invalid journal key: {arg}"))?;
            if db.journal(&key).is_none() {
                anyhow::bail!("unknown journal: {key}");
            }
            Ok(key)
        })
        .collect()
}
