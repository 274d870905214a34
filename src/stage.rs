//! Staging workflow: one candidate recording pending confirm or discard.

use chrono::{SecondsFormat, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::capture::AudioPayload;
use crate::db::{Database, DbError, Entry};
use crate::domain::{AUDIO_SUFFIX, JournalKey, Record, RecordKey, TagFilter, sanitize_name};
use crate::store::StoreError;

/// Name given to a fresh recording until the user renames it.
pub const DEFAULT_RECORDING_NAME: &str = "Recording";

/// Errors from staging operations.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("nothing is staged")]
    NothingStaged,

    #[error("staged candidate is not a fresh recording")]
    NotAFreshRecording,

    #[error("staged candidate is not an existing record")]
    NotInReview,

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What is currently staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// An unsaved captured payload with an editable name.
    Fresh { payload: AudioPayload, name: String },
    /// An existing persisted record under review.
    Review { key: RecordKey },
}

/// Holds at most one candidate at a time: either a fresh unsaved recording
/// or an existing record opened for review.
///
/// Fresh mode ends in `confirm` (persist as a new record, tagged with the
/// caller's currently active journals) or `discard`. Review mode supports
/// tag replacement, persisted immediately. Staged state must never
/// reference an invisible record; `sync_visibility` enforces that after
/// every query refresh.
#[derive(Debug, Default)]
pub struct Stage {
    candidate: Option<Candidate>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        self.candidate.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.candidate.is_none()
    }

    /// The record under review, if the stage is in review mode.
    pub fn staged_record(&self) -> Option<&RecordKey> {
        match &self.candidate {
            Some(Candidate::Review { key }) => Some(key),
            _ => None,
        }
    }

    /// Stages a freshly captured payload, replacing any current candidate.
    /// The candidate starts with the default editable name.
    pub fn stage_payload(&mut self, payload: AudioPayload) {
        self.candidate = Some(Candidate::Fresh {
            payload,
            name: DEFAULT_RECORDING_NAME.to_string(),
        });
    }

    /// Stages an existing record for review, silently replacing any
    /// current candidate. Staging the record that is already under review
    /// is a no-op; returns whether the candidate changed.
    pub fn stage_record(&mut self, key: RecordKey) -> bool {
        if self.staged_record() == Some(&key) {
            return false;
        }
        self.candidate = Some(Candidate::Review { key });
        true
    }

    /// Renames the fresh candidate.
    ///
    /// # Errors
    ///
    /// `NothingStaged` / `NotAFreshRecording` outside fresh mode.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), StageError> {
        match &mut self.candidate {
            Some(Candidate::Fresh { name: n, .. }) => {
                *n = name.into();
                Ok(())
            }
            Some(Candidate::Review { .. }) => Err(StageError::NotAFreshRecording),
            None => Err(StageError::NothingStaged),
        }
    }

    /// Clears an unsaved candidate without persisting anything.
    pub fn discard(&mut self) {
        self.candidate = None;
    }

    /// Commits the fresh candidate: writes the payload file, creates a
    /// record tagged with the filter's currently active journals, and
    /// clears the stage.
    ///
    /// A name that sanitizes to nothing falls back to the default
    /// recording name; otherwise the raw name is kept for display and its
    /// sanitized form lands in the key.
    ///
    /// The payload write and the metadata write are separate file
    /// operations; a failure between them leaves the payload file behind
    /// and surfaces the error, with the candidate still staged for retry.
    ///
    /// # Errors
    ///
    /// `NothingStaged` / `NotAFreshRecording` outside fresh mode; store
    /// errors from either write.
    pub fn confirm(
        &mut self,
        db: &mut Database,
        filter: &TagFilter,
    ) -> Result<Record, StageError> {
        let (payload, name) = match &self.candidate {
            Some(Candidate::Fresh { payload, name }) => (payload, name),
            Some(Candidate::Review { .. }) => return Err(StageError::NotAFreshRecording),
            None => return Err(StageError::NothingStaged),
        };

        let clean = sanitize_name(name);
        let display = if clean.is_empty() {
            DEFAULT_RECORDING_NAME
        } else {
            name.as_str()
        };
        let clean = if clean.is_empty() {
            DEFAULT_RECORDING_NAME.to_string()
        } else {
            clean
        };

        let payload_rel = format!(
            "{} {clean}{AUDIO_SUFFIX}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        db.store().write_payload(&payload_rel, &payload.bytes)?;

        let tags: BTreeSet<JournalKey> = filter.active_keys().into_iter().collect();
        let record = db.create_record(display, tags, vec![payload_rel])?;

        self.candidate = None;
        Ok(record)
    }

    /// Replaces the reviewed record's tag set (full overwrite), persisted
    /// immediately.
    ///
    /// # Errors
    ///
    /// `NothingStaged` / `NotInReview` outside review mode.
    pub fn edit_tags(
        &mut self,
        db: &mut Database,
        tags: BTreeSet<JournalKey>,
    ) -> Result<Record, StageError> {
        let key = match &self.candidate {
            Some(Candidate::Review { key }) => key.clone(),
            Some(Candidate::Fresh { .. }) => return Err(StageError::NotInReview),
            None => return Err(StageError::NothingStaged),
        };
        let record = db.replace_tags(&key, tags)?;
        Ok(record.clone())
    }

    /// Re-evaluates the staged record against the currently visible
    /// entries. A review-mode candidate that is no longer in the list
    /// (tags changed, journal toggled off, record deleted) is cleared;
    /// fresh candidates are unaffected. Returns whether the stage cleared
    /// itself.
    pub fn sync_visibility(&mut self, visible: &[Entry]) -> bool {
        let Some(Candidate::Review { key }) = &self.candidate else {
            return false;
        };
        if visible.iter().any(|e| &e.key == key) {
            return false;
        }
        self.candidate = None;
        true
    }
}
