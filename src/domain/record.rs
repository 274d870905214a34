//! Record type: one persisted journal entry with attached payload files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::{JournalKey, RecordKey};

/// File name suffix identifying the audio payload among a record's
/// attached files.
pub const AUDIO_SUFFIX: &str = ".ogg";

/// A single journaled entry.
///
/// The key carries identity, timestamp, and a clean title; the metadata
/// file carries the raw display name, the tag set, and the attached payload
/// file references (relative to the collection root).
///
/// Tags are journal references, not a foreign-key-enforced relation: a
/// record may reference journals that have since been deleted. Tag mutation
/// is full-set replacement followed by a save, never incremental.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    key: RecordKey,
    name: String,
    tags: BTreeSet<JournalKey>,
    data: Vec<String>,
}

/// The on-disk metadata schema (`*.meta.json`).
///
/// All three fields are required; a JSON file missing any of them is
/// malformed, never silently defaulted.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordMeta {
    pub name: String,
    pub tags: Vec<JournalKey>,
    pub data: Vec<String>,
}

impl Record {
    /// Assembles a record from its key and parsed metadata.
    pub fn new(key: RecordKey, meta: RecordMeta) -> Self {
        Self {
            key,
            name: meta.name,
            tags: meta.tags.into_iter().collect(),
            data: meta.data,
        }
    }

    /// Returns the record's stable key.
    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    /// Returns the raw display name from the metadata.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the record's tag set.
    pub fn tags(&self) -> &BTreeSet<JournalKey> {
        &self.tags
    }

    /// Replaces the entire tag set.
    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = JournalKey>) {
        self.tags = tags.into_iter().collect();
    }

    /// Returns the attached payload file references, in metadata order.
    pub fn data(&self) -> &[String] {
        &self.data
    }

    /// The audio payload: the first attached file ending in `.ogg`.
    pub fn audio(&self) -> Option<&str> {
        self.data
            .iter()
            .map(String::as_str)
            .find(|f| f.ends_with(AUDIO_SUFFIX))
    }

    /// Serializes the record back into its on-disk metadata form.
    pub fn to_meta(&self) -> RecordMeta {
        RecordMeta {
            name: self.name.clone(),
            tags: self.tags.iter().cloned().collect(),
            data: self.data.clone(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.key)
    }
}
