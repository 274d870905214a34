//! Journal type: a named tag with persistent identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::sanitize_name;

/// Stable identity of a journal: its file name relative to the collection
/// root, e.g. `"WorkNotes.journal.json"`.
///
/// Record tag sets reference journals by this key. The key is derived from
/// the display name by stripping non-word characters, so two different
/// display names can sanitize to the same key; the store rejects that
/// collision at creation time.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JournalKey(String);

/// Error returned when parsing an invalid journal key.
#[derive(Debug, Clone)]
pub struct ParseJournalKeyError(String);

impl fmt::Display for ParseJournalKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseJournalKeyError {}

/// File name suffix identifying journal definition files.
pub const JOURNAL_SUFFIX: &str = ".journal.json";

impl JournalKey {
    /// Derives a key from a display name by sanitizing it.
    ///
    /// # Errors
    ///
    /// Returns `ParseJournalKeyError` if the name sanitizes to an empty
    /// string (nothing but non-word characters).
    pub fn from_name(name: &str) -> Result<Self, ParseJournalKeyError> {
        let clean = sanitize_name(name);
        if clean.is_empty() {
            return Err(ParseJournalKeyError(format!(
                "journal name '{name}' contains no usable characters"
            )));
        }
        Ok(Self(format!("{clean}{JOURNAL_SUFFIX}")))
    }

    /// Returns the key as a relative path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The sanitized stem, without the `.journal.json` suffix.
    pub fn stem(&self) -> &str {
        self.0.strip_suffix(JOURNAL_SUFFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for JournalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for JournalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JournalKey(\"{}\")", self.0)
    }
}

impl FromStr for JournalKey {
    type Err = ParseJournalKeyError;

    /// Parses a key from its on-disk relative path form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.ends_with(JOURNAL_SUFFIX) || s.len() == JOURNAL_SUFFIX.len() {
            return Err(ParseJournalKeyError(format!(
                "not a journal key (expected '<name>{JOURNAL_SUFFIX}'): {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl Serialize for JournalKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JournalKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A named tag used to scope record visibility.
///
/// Persisted as a small JSON file (`{"name": ...}`) whose file name is the
/// key. Immutable once created, except for deletion. Deleting a journal does
/// not rewrite the records referencing it; dangling references are handled
/// by [`TagFilter`](crate::domain::TagFilter)'s default-open policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journal {
    key: JournalKey,
    name: String,
}

impl Journal {
    /// Creates a journal from an already-derived key and its display name.
    pub fn new(key: JournalKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }

    /// Returns the journal's stable key.
    pub fn key(&self) -> &JournalKey {
        &self.key
    }

    /// Returns the journal's display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.key)
    }
}
