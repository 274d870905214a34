//! CLI command definitions and handlers

pub mod handlers;
pub mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// audiolog - timestamped audio journal entries with tag-scoped visibility
#[derive(Parser, Debug)]
#[command(name = "audiolog", version, about, long_about = None)]
pub struct Cli {
    /// Collection root directory (overrides remembered collections)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the collection and report what loads (and what does not)
    Scan(ScanArgs),

    /// Show the year/month/day tree, or the entries of one bucket
    #[command(name = "ls")]
    List(ListArgs),

    /// List journals
    Journals(JournalsArgs),

    /// Create a journal
    JournalAdd(JournalAddArgs),

    /// Delete a journal (records keep their now-dangling tags)
    JournalRm(JournalRmArgs),

    /// Record an audio file into the collection as a new entry
    Import(ImportArgs),

    /// Delete a record and its payload files
    Rm(RmArgs),

    /// Replace a record's journal tags
    Retag(RetagArgs),

    /// Show or change persistent settings
    Settings(SettingsArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScanArgs {}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Year bucket to list entries for
    #[arg(long)]
    pub year: Option<i32>,

    /// Month bucket (requires --year)
    #[arg(long, requires = "year")]
    pub month: Option<u32>,

    /// Day bucket (requires --month)
    #[arg(long, requires = "month")]
    pub day: Option<u32>,

    /// Deactivate a journal for this listing (repeatable)
    #[arg(long = "off", value_name = "JOURNAL")]
    pub off: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct JournalsArgs {}

#[derive(clap::Args, Debug)]
pub struct JournalAddArgs {
    /// Display name; the key is derived by sanitization
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct JournalRmArgs {
    /// Journal key, e.g. WorkNotes.journal.json
    pub key: String,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Audio file to record into the collection
    pub file: PathBuf,

    /// Display name for the new record
    #[arg(short, long)]
    pub name: Option<String>,

    /// Tag only these journals (default: every known journal)
    #[arg(long = "journal", value_name = "KEY")]
    pub journals: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Record key, e.g. "2024-01-15T10:00:00Z Note.meta.json"
    pub key: String,
}

#[derive(clap::Args, Debug)]
pub struct RetagArgs {
    /// Record key
    pub key: String,

    /// Journal keys to tag the record with (empty clears all tags)
    pub journals: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct SettingsArgs {
    /// Select the audio input device
    #[arg(long)]
    pub input: Option<String>,

    /// Set the playback volume (clamped to 0..=1)
    #[arg(long)]
    pub volume: Option<f32>,

    /// Mute, remembering the current volume
    #[arg(long, conflicts_with = "volume")]
    pub mute: bool,

    /// Restore the last positive volume
    #[arg(long, conflicts_with_all = ["volume", "mute"])]
    pub restore: bool,

    /// Remember a collection root
    #[arg(long, value_name = "PATH")]
    pub add_collection: Option<PathBuf>,
}
