//! Scan command handler.

use anyhow::{Context, Result};
use std::path::Path;

use crate::db::Database;

pub fn handle_scan(root: &Path) -> Result<()> {
    let (db, errors) = Database::open(root)
        .with_context(|| format!("failed to open collection at {}", root.display()))?;

    super::report_scan_errors(&errors);

    if errors.is_empty() {
        println!(
            "Loaded {} records and {} journals",
            db.record_count(),
            db.journals().count()
        );
    } else {
        eprintln!(
            "Loaded {} records and {} journals with {} files skipped",
            db.record_count(),
            db.journals().count(),
            errors.len()
        );
    }
    Ok(())
}
