//! User statistics aggregates.
//!
//! These are computed by the backend from a user's game entries and fetched
//! per username. They are not updated locally when entries change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::GameStatus;

/// Aggregate statistics for one user's library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStatistics {
    /// Mean rating over rated entries (None if nothing is rated)
    #[serde(default)]
    pub average_rating: Option<f64>,

    // ─── Distributions (for charts) ──────────────────────────────
    /// Entry count per status
    #[serde(default)]
    pub game_status_distribution: BTreeMap<GameStatus, u32>,
    /// Entry count per genre
    #[serde(default)]
    pub game_genre_distribution: BTreeMap<String, u32>,
    /// Entry count per platform
    #[serde(default)]
    pub platform_distribution: BTreeMap<String, u32>,
    /// Entry count per release year ("YYYY")
    #[serde(default)]
    pub release_year_distribution: BTreeMap<String, u32>,
    /// Entry count per year played ("YYYY")
    #[serde(default)]
    pub play_year_distribution: BTreeMap<String, u32>,
}

impl UserStatistics {
    /// Total number of entries in the library.
    pub fn total_games(&self) -> u32 {
        self.game_status_distribution.values().sum()
    }

    /// Most common genre; ties go to the alphabetically first.
    pub fn top_genre(&self) -> Option<&str> {
        top_key(&self.game_genre_distribution)
    }

    /// Most common platform; ties go to the alphabetically first.
    pub fn top_platform(&self) -> Option<&str> {
        top_key(&self.platform_distribution)
    }
}

fn top_key(distribution: &BTreeMap<String, u32>) -> Option<&str> {
    // max_by_key keeps the last maximum, so iterate in reverse for stable ties
    distribution
        .iter()
        .rev()
        .max_by_key(|(_, count)| **count)
        .map(|(key, _)| key.as_str())
}
