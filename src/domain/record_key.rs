//! Record keys: timestamp-prefixed relative paths of record metadata files.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File name suffix identifying record metadata files.
pub const META_SUFFIX: &str = ".meta.json";

/// Stable identity of a record: the relative path of its metadata file,
/// e.g. `"2024-01-15T10:30:00Z Standup.meta.json"`.
///
/// The creation timestamp and a clean title are both recoverable from the
/// key alone, so a record stays identifiable even when its metadata file is
/// corrupt. The timestamp is the leading ISO-8601 token of the file name; it
/// is never stored inside the metadata.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(String);

/// Error returned when parsing an invalid record key.
#[derive(Debug, Clone)]
pub struct ParseRecordKeyError(String);

impl fmt::Display for ParseRecordKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseRecordKeyError {}

impl RecordKey {
    /// Composes a key from a creation timestamp and an already-sanitized
    /// name.
    pub fn compose(ts: DateTime<Utc>, clean_name: &str) -> Self {
        Self(format!(
            "{} {clean_name}{META_SUFFIX}",
            ts.to_rfc3339_opts(SecondsFormat::Secs, true)
        ))
    }

    /// Returns the key as a relative path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file name portion of the key (records may live in
    /// subdirectories of the collection root).
    fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The creation timestamp derived from the leading ISO-8601 token of
    /// the file name.
    ///
    /// A file name without a parseable leading token is assigned "now".
    /// This is a policy choice, not an error: such records still index and
    /// display, they just sort as current.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.parsed_timestamp().unwrap_or_else(Utc::now)
    }

    /// The timestamp actually encoded in the key, if any.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let (token, rest) = self.file_name().split_once(' ')?;
        if rest.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc3339(token)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// The clean title derived from the file name: everything after the
    /// timestamp token, with the `.meta.json` suffix removed.
    pub fn title(&self) -> &str {
        let name = self.file_name();
        let name = name.strip_suffix(META_SUFFIX).unwrap_or(name);
        match name.split_once(' ') {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => name,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordKey(\"{}\")", self.0)
    }
}

impl FromStr for RecordKey {
    type Err = ParseRecordKeyError;

    /// Parses a key from its on-disk relative path form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.ends_with(META_SUFFIX) || s.len() == META_SUFFIX.len() {
            return Err(ParseRecordKeyError(format!(
                "not a record key (expected '<name>{META_SUFFIX}'): {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl Serialize for RecordKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
