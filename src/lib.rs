//! audiolog - timestamped audio journal entries with tag-scoped visibility

pub mod capture;
pub mod cli;
pub mod db;
pub mod domain;
pub mod index;
pub mod stage;
pub mod store;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    handlers::{
        handle_import, handle_journal_add, handle_journal_rm, handle_journals, handle_list,
        handle_retag, handle_rm, handle_scan, handle_settings,
    },
    settings::Settings,
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let root = settings.collection_root(cli.dir.as_ref());

    match &cli.command {
        Command::Scan(_) => handle_scan(&root),
        Command::List(args) => handle_list(args, &root),
        Command::Journals(_) => handle_journals(&root),
        Command::JournalAdd(args) => handle_journal_add(args, &root),
        Command::JournalRm(args) => handle_journal_rm(args, &root),
        Command::Import(args) => handle_import(args, &root),
        Command::Rm(args) => handle_rm(args, &root),
        Command::Retag(args) => handle_retag(args, &root),
        Command::Settings(args) => handle_settings(args),
    }
}
