//! Core types: Journal, Record, their keys, and the tag visibility filter

mod journal;
mod record;
mod record_key;
mod sanitize;
mod tag_filter;

pub use journal::{JOURNAL_SUFFIX, Journal, JournalKey, ParseJournalKeyError};
pub use record::{AUDIO_SUFFIX, Record, RecordMeta};
pub use record_key::{META_SUFFIX, ParseRecordKeyError, RecordKey};
pub use sanitize::sanitize_name;
pub use tag_filter::TagFilter;
