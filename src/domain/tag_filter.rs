//! Per-view tag activation map deciding record visibility.

use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::domain::JournalKey;

/// Ephemeral per-view mapping of journal key to active state.
///
/// Each UI surface owns its own filter (the main entry list and the staging
/// editor do not share activation state). The filter is never persisted.
///
/// Visibility contract for a record's tag set:
/// - empty tag set: always visible, regardless of any journal's state
/// - at least one tag known to the map and active: visible
/// - at least one tag known to the map, none of them active: hidden
/// - no tag known to the map at all (all dangling references): visible
///
/// The last case is the default-open policy for orphaned tags; a record
/// whose journals were all deleted stays reachable.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    states: HashMap<JournalKey, bool>,
}

impl TagFilter {
    /// Creates an empty filter (no journals known).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a journal, active by default. Keeps an existing state if
    /// the journal is already known.
    pub fn register(&mut self, key: JournalKey) {
        self.states.entry(key).or_insert(true);
    }

    /// Sets a journal's activation state, registering it if unknown.
    pub fn set_active(&mut self, key: JournalKey, active: bool) {
        self.states.insert(key, active);
    }

    /// Forgets a journal entirely.
    ///
    /// Records still referencing it then fall under the dangling-reference
    /// rule rather than the inactive rule.
    pub fn remove(&mut self, key: &JournalKey) {
        self.states.remove(key);
    }

    /// Returns whether a journal is known and active.
    pub fn is_active(&self, key: &JournalKey) -> bool {
        self.states.get(key).copied().unwrap_or(false)
    }

    /// Returns the currently active journal keys, sorted.
    pub fn active_keys(&self) -> Vec<JournalKey> {
        let mut keys: Vec<_> = self
            .states
            .iter()
            .filter(|(_, active)| **active)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Decides whether a record with the given tag set is visible.
    ///
    /// Pure function of the activation map and the tag set; no side
    /// effects.
    pub fn is_visible(&self, tags: &BTreeSet<JournalKey>) -> bool {
        if tags.is_empty() {
            return true;
        }
        let mut any_known = false;
        for tag in tags {
            match self.states.get(tag) {
                Some(true) => return true,
                Some(false) => any_known = true,
                None => {}
            }
        }
        !any_known
    }
}
