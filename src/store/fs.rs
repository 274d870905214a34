//! File I/O for journal and record files with atomic metadata writes.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::{Journal, JournalKey, Record, RecordKey, RecordMeta, sanitize_name};

/// Errors during file system operations on the collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed metadata in {path}: {reason}")]
    MalformedMetadata { path: PathBuf, reason: String },

    #[error("journal already exists: {key}")]
    JournalExists { key: JournalKey },

    #[error("name '{name}' contains no usable characters")]
    InvalidName { name: String },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Creates an appropriate StoreError from an io::Error.
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied { path: path.into() },
            _ => StoreError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// The on-disk journal schema (`*.journal.json`). The `name` field is
/// required.
#[derive(Debug, Serialize, Deserialize)]
struct JournalMeta {
    name: String,
}

/// Per-file outcome of a best-effort delete.
#[derive(Debug)]
pub struct FileFailure {
    pub file: String,
    pub error: StoreError,
}

/// Aggregated outcome of deleting a record and its payload files.
///
/// Deletion is best-effort, not atomic: the metadata file and every payload
/// file are unlinked independently and each failure is collected here. The
/// caller must inspect all outcomes; there is no rollback.
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Whether the metadata file itself was removed.
    pub metadata_removed: bool,
    /// Payload references whose files were removed.
    pub removed: Vec<String>,
    /// Files that could not be removed, metadata included.
    pub failed: Vec<FileFailure>,
}

impl DeleteReport {
    /// True when every file was removed.
    pub fn is_clean(&self) -> bool {
        self.metadata_removed && self.failed.is_empty()
    }
}

/// Filesystem access for one collection root.
///
/// An explicit handle constructed once and passed to whoever needs it; the
/// store never consults ambient global state.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Binds a store to a collection root.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` / `NotADirectory` if the root is unusable.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if !root.exists() {
            return Err(StoreError::NotFound { path: root });
        }
        if !root.is_dir() {
            return Err(StoreError::NotADirectory { path: root });
        }
        Ok(Self { root })
    }

    /// Returns the collection root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a root-relative file reference to an absolute path.
    pub fn resolve(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Loads one journal definition file.
    ///
    /// # Errors
    ///
    /// Returns `MalformedMetadata` for JSON that fails to parse or lacks
    /// the required `name` field.
    pub fn load_journal(&self, key: JournalKey) -> Result<Journal, StoreError> {
        let path = self.resolve(key.as_str());
        let bytes = std::fs::read(&path).map_err(|e| StoreError::from_io(&path, e))?;
        let meta: JournalMeta =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::MalformedMetadata {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        Ok(Journal::new(key, meta.name))
    }

    /// Loads one record metadata file.
    ///
    /// # Errors
    ///
    /// Returns `MalformedMetadata` for JSON that fails to parse or lacks
    /// any of the required `name` / `tags` / `data` fields.
    pub fn load_record(&self, key: RecordKey) -> Result<Record, StoreError> {
        let path = self.resolve(key.as_str());
        let bytes = std::fs::read(&path).map_err(|e| StoreError::from_io(&path, e))?;
        let meta: RecordMeta =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::MalformedMetadata {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        Ok(Record::new(key, meta))
    }

    /// Creates a new journal from a display name.
    ///
    /// The name is sanitized into the key; the raw name is persisted for
    /// display. A sanitized-key collision with an existing journal is
    /// rejected rather than silently overwritten.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if nothing survives sanitization and
    /// `JournalExists` on a key collision.
    pub fn create_journal(&self, name: &str) -> Result<Journal, StoreError> {
        let key = JournalKey::from_name(name).map_err(|_| StoreError::InvalidName {
            name: name.to_string(),
        })?;
        let path = self.resolve(key.as_str());
        if path.exists() {
            return Err(StoreError::JournalExists { key });
        }
        let meta = JournalMeta {
            name: name.to_string(),
        };
        self.write_json(&path, &meta)?;
        Ok(Journal::new(key, name))
    }

    /// Unlinks a journal definition file.
    ///
    /// Records referencing the journal are not rewritten; their tag sets
    /// keep the now-dangling key.
    pub fn delete_journal(&self, journal: &Journal) -> Result<(), StoreError> {
        let path = self.resolve(journal.key().as_str());
        std::fs::remove_file(&path).map_err(|e| StoreError::from_io(&path, e))
    }

    /// Creates a new record: synthesizes a timestamp-prefixed key from the
    /// sanitized display name, writes the metadata file, and returns the
    /// record. Payload files in `data` are expected to exist already.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if the name sanitizes to nothing.
    pub fn create_record(
        &self,
        name: &str,
        tags: BTreeSet<JournalKey>,
        data: Vec<String>,
    ) -> Result<Record, StoreError> {
        let clean = sanitize_name(name);
        if clean.is_empty() {
            return Err(StoreError::InvalidName {
                name: name.to_string(),
            });
        }
        let key = RecordKey::compose(Utc::now(), &clean);
        let record = Record::new(
            key,
            RecordMeta {
                name: name.to_string(),
                tags: tags.into_iter().collect(),
                data,
            },
        );
        self.save_record(&record)?;
        Ok(record)
    }

    /// Persists a record's metadata with a full atomic rewrite.
    pub fn save_record(&self, record: &Record) -> Result<(), StoreError> {
        let path = self.resolve(record.key().as_str());
        self.write_json(&path, &record.to_meta())
    }

    /// Deletes a record's metadata file and every attached payload file.
    ///
    /// Best-effort: each unlink is attempted independently and the report
    /// collects every outcome. The filesystem is left in whatever partial
    /// state the failures produced.
    pub fn delete_record(&self, record: &Record) -> DeleteReport {
        let mut report = DeleteReport::default();

        let meta_rel = record.key().as_str();
        let meta_path = self.resolve(meta_rel);
        match std::fs::remove_file(&meta_path) {
            Ok(()) => report.metadata_removed = true,
            Err(e) => report.failed.push(FileFailure {
                file: meta_rel.to_string(),
                error: StoreError::from_io(&meta_path, e),
            }),
        }

        for rel in record.data() {
            let path = self.resolve(rel);
            match std::fs::remove_file(&path) {
                Ok(()) => report.removed.push(rel.clone()),
                Err(e) => report.failed.push(FileFailure {
                    file: rel.clone(),
                    error: StoreError::from_io(&path, e),
                }),
            }
        }

        report
    }

    /// Writes a payload blob under the collection root.
    pub fn write_payload(&self, rel: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(rel);
        self.write_atomic(&path, bytes)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(value).map_err(|e| StoreError::MalformedMetadata {
            path: path.into(),
            reason: e.to_string(),
        })?;
        self.write_atomic(path, &json)
    }

    /// Writes via a temp file in the same directory plus an atomic rename,
    /// so readers never observe a partial file.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let parent = path.parent().unwrap_or(&self.root);
        let mut temp = NamedTempFile::new_in(parent).map_err(|e| StoreError::Io {
            path: path.into(),
            source: e,
        })?;
        temp.write_all(bytes).map_err(|e| StoreError::Io {
            path: path.into(),
            source: e,
        })?;
        temp.persist(path).map_err(|e| StoreError::AtomicWrite {
            path: path.into(),
            source: e.error,
        })?;
        Ok(())
    }
}
