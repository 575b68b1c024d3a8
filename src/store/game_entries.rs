// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Game entry slice and its read selectors.
//!
//! Selectors are pure functions over a snapshot of the map and are recomputed
//! on every read. Libraries are a few hundred entries, so O(n) is fine.

use crate::models::{GameEntry, GameStatus};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

/// Cached game entries keyed by entry ID.
#[derive(Debug, Default)]
pub struct GameEntrySlice {
    entries: RwLock<HashMap<u64, GameEntry>>,
}

impl GameEntrySlice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new map built from `entries`. Nothing from the old map survives.
    pub fn replace_all(&self, entries: Vec<GameEntry>) {
        let map: HashMap<u64, GameEntry> = entries.into_iter().map(|e| (e.id, e)).collect();
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = map;
    }

    /// Insert or replace one entry.
    pub fn upsert(&self, entry: GameEntry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entry.id, entry);
    }

    /// Insert or replace several entries under one lock.
    pub fn upsert_many(&self, entries: Vec<GameEntry>) {
        let mut map = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for entry in entries {
            map.insert(entry.id, entry);
        }
    }

    /// Remove an entry; returns whether it was present.
    pub fn remove(&self, entry_id: u64) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&entry_id)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn get(&self, entry_id: u64) -> Option<GameEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&entry_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current map.
    pub fn snapshot(&self) -> HashMap<u64, GameEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Entries grouped by status. All five statuses are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPartition {
    groups: BTreeMap<GameStatus, Vec<GameEntry>>,
}

impl StatusPartition {
    /// Entries with `status`, ordered by game name then ID.
    pub fn get(&self, status: GameStatus) -> &[GameEntry] {
        self.groups
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of entries across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameStatus, &[GameEntry])> {
        self.groups
            .iter()
            .map(|(status, entries)| (*status, entries.as_slice()))
    }
}

/// Group entries by status.
pub fn partition_by_status(entries: &HashMap<u64, GameEntry>) -> StatusPartition {
    let mut groups: BTreeMap<GameStatus, Vec<GameEntry>> = GameStatus::ALL
        .into_iter()
        .map(|status| (status, Vec::new()))
        .collect();

    for entry in entries.values() {
        groups.entry(entry.status).or_default().push(entry.clone());
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.game_name.cmp(&b.game_name).then(a.id.cmp(&b.id)));
    }

    StatusPartition { groups }
}

/// The entry for a catalog game, if the library has one.
///
/// The backend keeps at most one entry per (user, game); with several users'
/// entries cached, the lowest entry ID wins.
pub fn find_by_game(entries: &HashMap<u64, GameEntry>, game_id: u64) -> Option<GameEntry> {
    entries
        .values()
        .filter(|e| e.game_id == game_id)
        .min_by_key(|e| e.id)
        .cloned()
}

/// Favourite entries, ordered by game name.
pub fn favourites(entries: &HashMap<u64, GameEntry>) -> Vec<GameEntry> {
    let mut favs: Vec<GameEntry> = entries.values().filter(|e| e.is_favourite).cloned().collect();
    favs.sort_by(|a, b| a.game_name.cmp(&b.game_name).then(a.id.cmp(&b.id)));
    favs
}

/// All entries ordered by ID.
pub fn sorted_by_id(entries: &HashMap<u64, GameEntry>) -> Vec<GameEntry> {
    let mut all: Vec<GameEntry> = entries.values().cloned().collect();
    all.sort_by_key(|e| e.id);
    all
}
