//! Ranked, bounded, persisted results
//!
//! This module manages the kiosk leaderboard: a capacity-bounded collection
//! of (name, score) results, re-sorted and truncated on every insertion and
//! persisted as a single JSON blob under one storage key. Corrupt or absent
//! stored data degrades to an empty collection; persistence never fails the
//! session.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    constants::leaderboard::{DEFAULT_CAPACITY, STORAGE_KEY},
    names,
    presenter::KeyValueStore,
};

/// One ranked result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Player name, user-supplied or auto-generated
    pub name: String,
    /// Final session score
    pub score: u32,
}

/// Shape of the persisted blob
///
/// Kept as a wrapper object rather than a bare array so the stored format
/// can grow fields without breaking old saves.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SaveData {
    entries: Vec<Entry>,
}

/// Owns the ranked result collection
///
/// Entries are ordered by score descending with ties broken by name
/// ascending; anything past `capacity` is discarded permanently. The store
/// carries its own RNG so auto-generated names are reproducible when
/// constructed with [`LeaderboardStore::with_seed`].
#[derive(Debug)]
pub struct LeaderboardStore {
    entries: Vec<Entry>,
    capacity: usize,
    rng: fastrand::Rng,
}

impl Default for LeaderboardStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LeaderboardStore {
    /// Creates an empty store with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            rng: fastrand::Rng::new(),
        }
    }

    /// Creates an empty store with a seeded RNG for reproducible auto-names
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Loads the persisted collection from storage
    ///
    /// An absent, empty, or malformed blob yields an empty store with a
    /// warning; loading never surfaces an error. Loaded entries are
    /// re-sorted and re-truncated defensively in case the blob was written
    /// by an older or foreign build.
    pub fn load<K: KeyValueStore>(storage: &K, capacity: usize) -> Self {
        let mut store = Self::new(capacity);

        match storage.get_string(STORAGE_KEY) {
            None => {}
            Some(blob) => match serde_json::from_str::<SaveData>(&blob) {
                Ok(data) => {
                    store.entries = data.entries;
                    store.restore_order();
                    debug!(count = store.entries.len(), "loaded leaderboard");
                }
                Err(error) => {
                    warn!(%error, "stored leaderboard is malformed; starting empty");
                }
            },
        }

        store
    }

    /// Persists the full collection as one blob under the storage key
    pub fn save<K: KeyValueStore>(&self, storage: &mut K) {
        let data = SaveData {
            entries: self.entries.clone(),
        };
        match serde_json::to_string(&data) {
            Ok(blob) => storage.set_string(STORAGE_KEY, &blob),
            Err(error) => warn!(%error, "failed to serialize leaderboard; save skipped"),
        }
    }

    /// Inserts a result, re-ranks, and truncates to capacity
    ///
    /// A missing or blank `name` is replaced by a generated 6-character
    /// username. Returns the entry as inserted (the name it ended up with),
    /// whether or not it survived truncation.
    pub fn insert(&mut self, name: Option<&str>, score: u32) -> Entry {
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => names::generate(&mut self.rng),
        };

        let entry = Entry { name, score };
        self.entries.push(entry.clone());
        self.restore_order();
        entry
    }

    /// Inserts a result and persists the collection
    pub fn record<K: KeyValueStore>(
        &mut self,
        name: Option<&str>,
        score: u32,
        storage: &mut K,
    ) -> Entry {
        let entry = self.insert(name, score);
        self.save(storage);
        entry
    }

    /// Entries in rank order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the leaderboard has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn restore_order(&mut self) {
        self.entries = std::mem::take(&mut self.entries)
            .into_iter()
            .sorted_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)))
            .take(self.capacity)
            .collect_vec();
    }
}
