//! Import command handler.
//!
//! Drives the capture and staging workflow end to end with a file as the
//! audio source: the file body is captured as a single chunk, staged, named
//! and confirmed into the collection.

use anyhow::{Context, Result};
use std::path::Path;

use super::{open_collection, resolve_journals};
use crate::capture::Recorder;
use crate::cli::ImportArgs;
use crate::domain::TagFilter;
use crate::stage::Stage;

pub fn handle_import(args: &ImportArgs, root: &Path) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read audio file: {}", args.file.display()))?;

    let mut db = open_collection(root)?;

    // New entries are tagged with the active journals: the named ones, or
    // every known journal when none were given.
    let filter = if args.journals.is_empty() {
        db.default_filter()
    } else {
        let mut filter = TagFilter::new();
        for key in resolve_journals(&db, &args.journals)? {
            filter.register(key);
        }
        filter
    };

    let mut recorder = Recorder::new();
    recorder.set_input(Some(args.file.display().to_string()));
    recorder.start()?;
    recorder.push_chunk(bytes)?;
    let payload = recorder.stop()?;

    let mut stage = Stage::new();
    stage.stage_payload(payload);
    if let Some(name) = &args.name {
        stage.set_name(name)?;
    }
    let record = stage.confirm(&mut db, &filter)?;

    println!("Created {}", record.key());
    Ok(())
}
