//! Record command handlers.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

use super::{open_collection, resolve_journals};
use crate::cli::{RetagArgs, RmArgs};
use crate::domain::RecordKey;
use crate::stage::Stage;

pub fn handle_rm(args: &RmArgs, root: &Path) -> Result<()> {
    let mut db = open_collection(root)?;

    let key: RecordKey = args
        .key
        .parse()
        .with_context(|| format!("invalid record key: {}", args.key))?;
    let report = db.delete_record(&key)?;

    for removed in &report.removed {
        println!("Removed {}", removed);
    }
    for failure in &report.failed {
        eprintln!("  failed: {}: {}", failure.file, failure.error);
    }
    if !report.metadata_removed {
        anyhow::bail!("record metadata was not removed: {key}");
    }
    Ok(())
}

pub fn handle_retag(args: &RetagArgs, root: &Path) -> Result<()> {
    let mut db = open_collection(root)?;

    let key: RecordKey = args
        .key
        .parse()
        .with_context(|| format!("invalid record key: {}", args.key))?;
    if db.record(&key).is_none() {
        anyhow::bail!("unknown record: {key}");
    }
    let tags: BTreeSet<_> = resolve_journals(&db, &args.journals)?.into_iter().collect();

    let mut stage = Stage::new();
    stage.stage_record(key);
    let record = stage.edit_tags(&mut db, tags)?;

    if record.tags().is_empty() {
        println!("Cleared tags on {}", record.key());
    } else {
        for tag in record.tags() {
            println!("Tagged {}", tag);
        }
    }
    Ok(())
}
