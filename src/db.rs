//! Database: record store + journal registry + temporal index.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

use crate::domain::{Journal, JournalKey, Record, RecordKey, TagFilter};
use crate::index::TemporalIndex;
use crate::store::{DeleteReport, ScanError, Store, StoreError, scan_root};

/// Errors from database operations on top of the store's own failures.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("unknown record: {0}")]
    UnknownRecord(RecordKey),

    #[error("unknown journal: {0}")]
    UnknownJournal(JournalKey),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One row of a visible-entries query, ready for rendering:
/// display name, derived timestamp, and the key to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: RecordKey,
    pub name: String,
    pub ts: DateTime<Utc>,
}

/// The single entry point over one collection root.
///
/// Owns the in-memory key→record and key→journal maps plus the temporal
/// index. Everything is built by one full scan at startup and maintained
/// incrementally afterwards; the index itself is never persisted. The
/// composing root constructs one `Database` and hands out references; there
/// is no global instance.
#[derive(Debug)]
pub struct Database {
    store: Store,
    journals: BTreeMap<JournalKey, Journal>,
    records: BTreeMap<RecordKey, Record>,
    index: TemporalIndex,
}

impl Database {
    /// Opens a collection root: scans it, builds the maps and the temporal
    /// index, and returns the database together with the per-file scan
    /// failures. The index is complete before any query can be issued.
    ///
    /// # Errors
    ///
    /// Only an unusable root is fatal; malformed individual files are
    /// reported in the returned list and skipped.
    pub fn open(root: impl AsRef<Path>) -> Result<(Self, Vec<ScanError>), StoreError> {
        let store = Store::open(root.as_ref())?;
        let outcome = scan_root(&store)?;

        let mut db = Self {
            store,
            journals: BTreeMap::new(),
            records: BTreeMap::new(),
            index: TemporalIndex::new(),
        };
        for journal in outcome.journals {
            db.journals.insert(journal.key().clone(), journal);
        }
        for record in outcome.records {
            db.index
                .insert(record.key().clone(), record.key().timestamp());
            db.records.insert(record.key().clone(), record);
        }
        Ok((db, outcome.errors))
    }

    /// The collection root this database is bound to.
    pub fn root(&self) -> &Path {
        self.store.root()
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The temporal index, for bucket navigation.
    pub fn index(&self) -> &TemporalIndex {
        &self.index
    }

    /// All known journals, sorted by key.
    pub fn journals(&self) -> impl Iterator<Item = &Journal> {
        self.journals.values()
    }

    pub fn journal(&self, key: &JournalKey) -> Option<&Journal> {
        self.journals.get(key)
    }

    pub fn record(&self, key: &RecordKey) -> Option<&Record> {
        self.records.get(key)
    }

    /// Number of records currently loaded.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Returns the visible entries with `from <= ts < to` (either bound
    /// may be absent), filtered through the given activation map and
    /// sorted descending by timestamp. Ties keep their index iteration
    /// order (stable sort).
    pub fn entries_between(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        filter: &TagFilter,
    ) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .index
            .query(from, to)
            .into_iter()
            .filter_map(|key| self.records.get(key))
            .filter(|record| filter.is_visible(record.tags()))
            .map(|record| Entry {
                key: record.key().clone(),
                name: record.name().to_string(),
                ts: record.key().timestamp(),
            })
            .collect();
        entries.sort_by(|a, b| b.ts.cmp(&a.ts));
        entries
    }

    /// Creates and indexes a new record.
    pub fn create_record(
        &mut self,
        name: &str,
        tags: BTreeSet<JournalKey>,
        data: Vec<String>,
    ) -> Result<Record, StoreError> {
        let record = self.store.create_record(name, tags, data)?;
        self.index
            .insert(record.key().clone(), record.key().timestamp());
        self.records.insert(record.key().clone(), record.clone());
        Ok(record)
    }

    /// Replaces a record's tag set (full overwrite) and saves immediately.
    pub fn replace_tags(
        &mut self,
        key: &RecordKey,
        tags: BTreeSet<JournalKey>,
    ) -> Result<&Record, DbError> {
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| DbError::UnknownRecord(key.clone()))?;
        record.set_tags(tags);
        self.store.save_record(record)?;
        Ok(record)
    }

    /// Deletes a record's files, best-effort, and reports every per-file
    /// outcome. The in-memory entry is dropped only once the metadata file
    /// is actually gone; a failed metadata unlink keeps the record loaded,
    /// mirroring whatever partial state the filesystem ended up in.
    pub fn delete_record(&mut self, key: &RecordKey) -> Result<DeleteReport, DbError> {
        let record = self
            .records
            .get(key)
            .ok_or_else(|| DbError::UnknownRecord(key.clone()))?;
        let report = self.store.delete_record(record);
        if report.metadata_removed {
            self.index.remove(key, key.timestamp());
            self.records.remove(key);
        }
        Ok(report)
    }

    /// Creates and registers a new journal.
    pub fn create_journal(&mut self, name: &str) -> Result<Journal, StoreError> {
        let journal = self.store.create_journal(name)?;
        self.journals.insert(journal.key().clone(), journal.clone());
        Ok(journal)
    }

    /// Deletes a journal and drops it from the registry.
    ///
    /// Records referencing it are left untouched; their tags dangle and
    /// fall under the filter's default-open policy.
    pub fn delete_journal(&mut self, key: &JournalKey) -> Result<Journal, DbError> {
        let journal = self
            .journals
            .get(key)
            .cloned()
            .ok_or_else(|| DbError::UnknownJournal(key.clone()))?;
        self.store.delete_journal(&journal)?;
        self.journals.remove(key);
        Ok(journal)
    }

    /// A main-view filter with every known journal registered as active.
    pub fn default_filter(&self) -> TagFilter {
        let mut filter = TagFilter::new();
        for key in self.journals.keys() {
            filter.register(key.clone());
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn write_meta(dir: &TempDir, rel: &str, json: &str) {
        fs::write(dir.path().join(rel), json).unwrap();
    }

    fn open(dir: &TempDir) -> Database {
        let (db, errors) = Database::open(dir.path()).unwrap();
        assert!(errors.is_empty(), "unexpected scan errors: {errors:?}");
        db
    }

    #[test]
    fn open_builds_maps_and_index_from_scan() {
        let dir = TempDir::new().unwrap();
        write_meta(&dir, "Work.journal.json", r#"{"name": "Work"}"#);
        write_meta(
            &dir,
            "2024-01-15T10:00:00Z Note.meta.json",
            r#"{"name": "Note", "tags": [], "data": []}"#,
        );

        let db = open(&dir);
        assert_eq!(db.journals().count(), 1);
        assert_eq!(db.record_count(), 1);
        assert_eq!(db.index().len(), 1);
    }

    #[test]
    fn untagged_record_is_visible_regardless_of_activation() {
        // Spec scenario: one untagged record, unbounded query.
        let dir = TempDir::new().unwrap();
        write_meta(&dir, "Work.journal.json", r#"{"name": "Work"}"#);
        write_meta(
            &dir,
            "2024-01-01T10:00:00Z Note.meta.json",
            r#"{"name": "Note", "tags": [], "data": []}"#,
        );

        let db = open(&dir);
        let mut filter = db.default_filter();
        filter.set_active("Work.journal.json".parse().unwrap(), false);

        let entries = db.entries_between(None, None, &filter);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Note");
        assert_eq!(entries[0].ts, ts(2024, 1, 1, 10));
    }

    #[test]
    fn deleted_journal_leaves_record_visible_by_default_open() {
        let dir = TempDir::new().unwrap();
        write_meta(&dir, "Work.journal.json", r#"{"name": "Work"}"#);
        write_meta(
            &dir,
            "2024-01-01T10:00:00Z Note.meta.json",
            r#"{"name": "Note", "tags": ["Work.journal.json"], "data": []}"#,
        );

        let mut db = open(&dir);
        let key: JournalKey = "Work.journal.json".parse().unwrap();
        db.delete_journal(&key).unwrap();

        // Fresh filter built from the remaining journals lacks the key.
        let filter = db.default_filter();
        let entries = db.entries_between(None, None, &filter);
        assert_eq!(entries.len(), 1);

        // The record still carries the dangling tag on disk.
        let record = db
            .record(&"2024-01-01T10:00:00Z Note.meta.json".parse().unwrap())
            .unwrap();
        assert!(record.tags().contains(&key));
    }

    #[test]
    fn entries_between_sorts_descending_with_stable_ties() {
        let dir = TempDir::new().unwrap();
        write_meta(
            &dir,
            "2024-01-15T10:00:00Z Old.meta.json",
            r#"{"name": "Old", "tags": [], "data": []}"#,
        );
        write_meta(
            &dir,
            "2024-03-02T09:00:00Z New.meta.json",
            r#"{"name": "New", "tags": [], "data": []}"#,
        );
        write_meta(
            &dir,
            "2024-02-01T12:00:00Z Mid.meta.json",
            r#"{"name": "Mid", "tags": [], "data": []}"#,
        );

        let db = open(&dir);
        let entries = db.entries_between(None, None, &TagFilter::new());
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn entries_between_applies_bounds_and_filter() {
        let dir = TempDir::new().unwrap();
        write_meta(&dir, "Work.journal.json", r#"{"name": "Work"}"#);
        write_meta(
            &dir,
            "2024-01-15T10:00:00Z Tagged.meta.json",
            r#"{"name": "Tagged", "tags": ["Work.journal.json"], "data": []}"#,
        );
        write_meta(
            &dir,
            "2024-01-15T11:00:00Z Plain.meta.json",
            r#"{"name": "Plain", "tags": [], "data": []}"#,
        );
        write_meta(
            &dir,
            "2023-01-15T11:00:00Z LastYear.meta.json",
            r#"{"name": "LastYear", "tags": [], "data": []}"#,
        );

        let db = open(&dir);
        let mut filter = db.default_filter();
        filter.set_active("Work.journal.json".parse().unwrap(), false);

        let entries = db.entries_between(Some(ts(2024, 1, 1, 0)), None, &filter);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Plain"]);
    }

    #[test]
    fn create_record_is_immediately_queryable() {
        let dir = TempDir::new().unwrap();
        let mut db = open(&dir);

        let record = db
            .create_record("Fresh", BTreeSet::new(), vec![])
            .unwrap();
        assert_eq!(db.record_count(), 1);

        let entries = db.entries_between(None, None, &TagFilter::new());
        assert_eq!(entries.len(), 1);
        assert_eq!(&entries[0].key, record.key());
    }

    #[test]
    fn replace_tags_persists_full_overwrite() {
        let dir = TempDir::new().unwrap();
        write_meta(&dir, "A.journal.json", r#"{"name": "A"}"#);
        write_meta(&dir, "B.journal.json", r#"{"name": "B"}"#);
        write_meta(
            &dir,
            "2024-01-15T10:00:00Z Note.meta.json",
            r#"{"name": "Note", "tags": ["A.journal.json"], "data": []}"#,
        );

        let mut db = open(&dir);
        let key: RecordKey = "2024-01-15T10:00:00Z Note.meta.json".parse().unwrap();
        let b: JournalKey = "B.journal.json".parse().unwrap();
        db.replace_tags(&key, [b.clone()].into()).unwrap();

        // Reopen from disk: the overwrite was persisted.
        let db2 = open(&dir);
        let record = db2.record(&key).unwrap();
        assert_eq!(record.tags().len(), 1);
        assert!(record.tags().contains(&b));
    }

    #[test]
    fn delete_record_drops_entry_and_index_node() {
        let dir = TempDir::new().unwrap();
        write_meta(
            &dir,
            "2024-01-15T10:00:00Z Note.meta.json",
            r#"{"name": "Note", "tags": [], "data": []}"#,
        );

        let mut db = open(&dir);
        let key: RecordKey = "2024-01-15T10:00:00Z Note.meta.json".parse().unwrap();
        let report = db.delete_record(&key).unwrap();

        assert!(report.is_clean());
        assert_eq!(db.record_count(), 0);
        assert!(db.index().is_empty());
        assert!(matches!(
            db.delete_record(&key),
            Err(DbError::UnknownRecord(_))
        ));
    }

    #[test]
    fn delete_record_reports_partial_payload_failure() {
        let dir = TempDir::new().unwrap();
        write_meta(
            &dir,
            "2024-01-15T10:00:00Z Note.meta.json",
            r#"{"name": "Note", "tags": [], "data": ["gone.ogg"]}"#,
        );

        let mut db = open(&dir);
        let key: RecordKey = "2024-01-15T10:00:00Z Note.meta.json".parse().unwrap();
        let report = db.delete_record(&key).unwrap();

        // Metadata went away, the payload was already missing: the entry
        // is dropped, the failure is surfaced.
        assert!(report.metadata_removed);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(db.record_count(), 0);
    }

    #[test]
    fn journal_lifecycle_through_database() {
        let dir = TempDir::new().unwrap();
        let mut db = open(&dir);

        let journal = db.create_journal("Field Notes").unwrap();
        assert!(db.journal(journal.key()).is_some());

        db.delete_journal(journal.key()).unwrap();
        assert!(db.journal(journal.key()).is_none());
        assert!(matches!(
            db.delete_journal(journal.key()),
            Err(DbError::UnknownJournal(_))
        ));
    }
}
