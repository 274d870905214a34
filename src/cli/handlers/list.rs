//! List command handler.

use anyhow::Result;
use std::path::Path;

use super::{open_collection, resolve_journals};
use crate::cli::ListArgs;
use crate::db::Database;
use crate::index::bucket_range;

pub fn handle_list(args: &ListArgs, root: &Path) -> Result<()> {
    let db = open_collection(root)?;

    let mut filter = db.default_filter();
    for key in resolve_journals(&db, &args.off)? {
        filter.set_active(key, false);
    }

    match args.year {
        Some(year) => {
            let Some((from, to)) = bucket_range(year, args.month, args.day) else {
                anyhow::bail!("not a valid calendar bucket");
            };
            let entries = db.entries_between(Some(from), Some(to), &filter);
            if entries.is_empty() {
                println!("No entries");
                return Ok(());
            }
            for entry in entries {
                println!(
                    "{}  {}  ({})",
                    entry.ts.format("%Y-%m-%d %H:%M"),
                    entry.name,
                    entry.key
                );
            }
        }
        None => print_tree(&db),
    }
    Ok(())
}

/// Renders the year/month/day tree with per-day record counts.
fn print_tree(db: &Database) {
    if db.index().is_empty() {
        println!("No entries");
        return;
    }
    for year in db.index().years() {
        println!("{}", year.year());
        for month in year.months() {
            println!("  {:02}", month.month());
            for day in month.days() {
                println!("    {:02}  ({})", day.day(), day.records().len());
            }
        }
    }
}
