//! Journal command handlers.

use anyhow::{Context, Result};
use std::path::Path;

use super::open_collection;
use crate::cli::{JournalAddArgs, JournalRmArgs};
use crate::domain::JournalKey;

pub fn handle_journals(root: &Path) -> Result<()> {
    let db = open_collection(root)?;

    let mut any = false;
    for journal in db.journals() {
        println!("{}  ({})", journal.name(), journal.key());
        any = true;
    }
    if !any {
        println!("No journals");
    }
    Ok(())
}

pub fn handle_journal_add(args: &JournalAddArgs, root: &Path) -> Result<()> {
    let mut db = open_collection(root)?;

    let journal = db
        .create_journal(&args.name)
        .with_context(|| format!("failed to create journal: {}", args.name))?;
    println!("Created {}", journal.key());
    Ok(())
}

pub fn handle_journal_rm(args: &JournalRmArgs, root: &Path) -> Result<()> {
    let mut db = open_collection(root)?;

    let key: JournalKey = args
        .key
        .parse()
        .with_context(|| format!("invalid journal key: {}", args.key))?;
    let journal = db.delete_journal(&key)?;
    println!("Deleted {}", journal.key());
    Ok(())
}
