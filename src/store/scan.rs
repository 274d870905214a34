//! Startup scan: classify and load every journal and record under a root.

use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::domain::{JOURNAL_SUFFIX, Journal, META_SUFFIX, Record};
use crate::store::{Store, StoreError};

/// A per-file failure collected during a scan.
///
/// Scan failures never abort the scan; the rest of the collection still
/// loads.
#[derive(Debug)]
pub struct ScanError {
    pub path: PathBuf,
    pub error: StoreError,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// Everything found under a collection root.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub journals: Vec<Journal>,
    pub records: Vec<Record>,
    pub errors: Vec<ScanError>,
}

/// Recursively scans a collection root, classifying files by suffix into
/// journal definitions and record metadata and loading each one.
///
/// Hidden files and directories are skipped. Payload files and anything
/// else without a recognized suffix are ignored; they are only reachable
/// through record `data` references.
///
/// # Errors
///
/// Only the root itself failing to walk is a hard error; malformed or
/// unreadable individual files land in `ScanOutcome::errors`.
pub fn scan_root(store: &Store) -> Result<ScanOutcome, StoreError> {
    let mut outcome = ScanOutcome::default();

    for entry in WalkDir::new(store.root())
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walk error"));
                outcome.errors.push(ScanError {
                    path: path.clone(),
                    error: StoreError::Io { path, source },
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(rel) = rel_key(store.root(), entry.path()) else {
            continue;
        };

        if rel.ends_with(JOURNAL_SUFFIX) {
            match rel.parse().map_err(invalid_key(entry.path())) {
                Ok(key) => match store.load_journal(key) {
                    Ok(journal) => outcome.journals.push(journal),
                    Err(error) => outcome.errors.push(ScanError {
                        path: entry.path().to_path_buf(),
                        error,
                    }),
                },
                Err(error) => outcome.errors.push(ScanError {
                    path: entry.path().to_path_buf(),
                    error,
                }),
            }
        } else if rel.ends_with(META_SUFFIX) {
            match rel.parse().map_err(invalid_key(entry.path())) {
                Ok(key) => match store.load_record(key) {
                    Ok(record) => outcome.records.push(record),
                    Err(error) => outcome.errors.push(ScanError {
                        path: entry.path().to_path_buf(),
                        error,
                    }),
                },
                Err(error) => outcome.errors.push(ScanError {
                    path: entry.path().to_path_buf(),
                    error,
                }),
            }
        }
    }

    Ok(outcome)
}

fn invalid_key<E: fmt::Display>(path: &Path) -> impl FnOnce(E) -> StoreError {
    let path = path.to_path_buf();
    move |e| StoreError::MalformedMetadata {
        path,
        reason: e.to_string(),
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Root-relative key string with `/` separators.
fn rel_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
