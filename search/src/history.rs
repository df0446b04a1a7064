//! Search history
//!
//! Provides the bounded most-recent-first list of past search terms and the
//! store that mirrors it to key-value storage.
//!
//! Storage failures never reach the caller: a failed or malformed read is
//! treated as an empty history and a failed write is a no-op. Both are
//! logged at warn level.

use crate::storage::KeyValueStorage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use telescope_core::StorageError;
use tracing::{debug, warn};

/// Storage key the history is persisted under
pub const HISTORY_STORAGE_KEY: &str = "telescope_search_history";

/// Maximum number of history entries to keep
pub const MAX_HISTORY_ITEMS: usize = 10;

/// Past search terms, newest first, unique and bounded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored entries.
    ///
    /// Blank and duplicate entries are dropped (the first occurrence wins)
    /// and the list is cut to [`MAX_HISTORY_ITEMS`].
    pub fn from_entries(entries: impl IntoIterator<Item = String>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            if history.entries.len() == MAX_HISTORY_ITEMS {
                break;
            }
            if entry.trim().is_empty() || history.entries.contains(&entry) {
                continue;
            }
            history.entries.push(entry);
        }
        history
    }

    /// Move `term` to the front, inserting it if needed.
    ///
    /// `term` is expected to be trimmed already. Returns false for blank terms.
    pub fn record(&mut self, term: &str) -> bool {
        if term.trim().is_empty() {
            return false;
        }

        self.entries.retain(|entry| entry != term);
        self.entries.insert(0, term.to_string());
        self.entries.truncate(MAX_HISTORY_ITEMS);
        true
    }

    /// Remove the entry exactly equal to `term`
    pub fn remove(&mut self, term: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry != term);
        self.entries.len() != before
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The `limit` newest entries
    pub fn recent(&self, limit: usize) -> &[String] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load/save/clear of the history under a fixed storage key
#[derive(Clone)]
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl HistoryStore {
    /// Create a store using [`HISTORY_STORAGE_KEY`]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, HISTORY_STORAGE_KEY)
    }

    /// Create a store using a custom key
    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted list; empty when absent, unreadable or malformed
    pub fn load(&self) -> Vec<String> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load search history: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist `entries` as a JSON array of strings
    pub fn save(&self, entries: &[String]) {
        if let Err(e) = self.try_save(entries) {
            warn!("Failed to save search history: {}", e);
        }
    }

    /// Delete the persisted record
    pub fn clear(&self) {
        match self.storage.remove_item(&self.key) {
            Ok(()) => debug!("Search history cleared"),
            Err(e) => warn!("Failed to clear search history: {}", e),
        }
    }

    fn try_load(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str::<Vec<String>>(&raw).map_err(|e| StorageError::Malformed {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }

    fn try_save(&self, entries: &[String]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(entries).map_err(|e| StorageError::WriteFailed {
            key: self.key.clone(),
            reason: e.to_string(),
        })?;
        self.storage.set_item(&self.key, &raw)
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore").field("key", &self.key).finish()
    }
}
