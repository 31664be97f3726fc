//! Call history.
//!
//! A rolling record of executed calls, newest first, capped at
//! [`HISTORY_CAP`] entries per user.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::CallOutcome;
use crate::request::{ApiDefinition, HttpMethod};

/// Maximum number of history entries kept per user.
pub const HISTORY_CAP: usize = 50;

/// An immutable record of one executed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the call was made.
    pub timestamp: DateTime<Utc>,
    /// Name of the API definition that was sent.
    pub name: String,
    /// Environment the call targeted.
    pub environment: String,
    /// Endpoint path.
    pub path: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Response status code (0 for transport failures).
    pub status_code: u16,
    /// Elapsed time in milliseconds.
    pub time_ms: u64,
    /// Snapshot of the definition as it was sent, so the call can be
    /// reloaded later.
    pub config: ApiDefinition,
}

impl HistoryEntry {
    /// Builds an entry from a definition and its outcome.
    #[must_use]
    pub fn record(api: &ApiDefinition, environment: &str, outcome: &CallOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            name: api.name.clone(),
            environment: environment.to_string(),
            path: api.path.clone(),
            method: api.method,
            status_code: outcome.status,
            time_ms: outcome.time_ms,
            config: api.clone(),
        }
    }
}

/// Rolling history, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CallHistory {
    entries: VecDeque<HistoryEntry>,
}

/// Deserializes as a bare entry list, re-applying the cap so an oversized
/// persisted file (hand-edited or from an older version) cannot smuggle
/// more than [`HISTORY_CAP`] entries back in.
impl<'de> Deserialize<'de> for CallHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut entries = VecDeque::<HistoryEntry>::deserialize(deserializer)?;
        entries.truncate(HISTORY_CAP);
        Ok(Self { entries })
    }
}

impl CallHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an entry, dropping the oldest past [`HISTORY_CAP`].
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > HISTORY_CAP {
            self.entries.pop_back();
        }
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    /// Entry at position `index` (0 is the most recent).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no calls have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
