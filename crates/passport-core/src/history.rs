//! Recently generated photos.
//!
//! Storage is pluggable through [`HistoryStore`]. [`MemoryHistory`] keeps
//! entries in process; a browser front-end supplies its own store. History
//! is a convenience, so [`History`] swallows store failures after logging
//! them and the composition path never sees them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::compose::BackgroundMode;
use crate::config::HISTORY_CAPACITY;
use crate::editor::EditorState;
use crate::geometry::CropRect;

/// Errors reported by a [`HistoryStore`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The backing storage could not be reached or is full.
    #[error("History storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be read back.
    #[error("History data is corrupted: {0}")]
    Corrupted(String),
}

/// Edit settings that produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSettings {
    pub rotation_degrees: f64,
    pub crop: CropRect,
    pub background: BackgroundMode,
}

impl EditSettings {
    pub fn capture(editor: &EditorState, background: BackgroundMode) -> Self {
        Self {
            rotation_degrees: editor.rotation.degrees(),
            crop: editor.crop,
            background,
        }
    }
}

/// One generated photo with the images it was made from.
///
/// Images are encoded PNG bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    pub timestamp_ms: u64,
    pub original_image: Vec<u8>,
    pub edited_image: Vec<u8>,
    pub composed_image: Vec<u8>,
    pub settings: EditSettings,
}

/// Persistence for history entries.
pub trait HistoryStore {
    /// Store `entry`, replacing any entry with the same id.
    fn save(&mut self, entry: HistoryEntry) -> Result<(), HistoryError>;

    /// All entries, newest first.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Delete the entry with `id`. Unknown ids are not an error.
    fn remove(&mut self, id: &str) -> Result<(), HistoryError>;

    fn clear(&mut self) -> Result<(), HistoryError>;
}

/// In-process store keeping the newest `capacity` entries.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    /// Newest at the front.
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for MemoryHistory {
    fn save(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        Ok(())
    }

    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.entries.iter().cloned().collect())
    }

    fn remove(&mut self, id: &str) -> Result<(), HistoryError> {
        self.entries.retain(|e| e.id != id);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        Ok(())
    }
}

/// Best-effort front for a [`HistoryStore`].
///
/// Failures are logged with `warn!` and otherwise ignored; reads fall back
/// to an empty list.
#[derive(Debug, Default)]
pub struct History<S> {
    store: S,
}

impl<S: HistoryStore> History<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Save `entry`. Returns whether the store accepted it.
    pub fn record(&mut self, entry: HistoryEntry) -> bool {
        let id = entry.id.clone();
        match self.store.save(entry) {
            Ok(()) => true,
            Err(e) => {
                warn!(id = %id, error = %e, "failed to save history entry");
                false
            }
        }
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.store.load().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load history");
            Vec::new()
        })
    }

    pub fn remove(&mut self, id: &str) {
        if let Err(e) = self.store.remove(id) {
            warn!(id = %id, error = %e, "failed to remove history entry");
        }
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear history");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
