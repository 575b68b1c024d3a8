// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Game library entries: one user's record of one game.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Where a user is with a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum GameStatus {
    Wishlist,
    Backlog,
    Playing,
    Completed,
    Dropped,
}

impl GameStatus {
    /// Every status, in display order.
    pub const ALL: [GameStatus; 5] = [
        GameStatus::Wishlist,
        GameStatus::Backlog,
        GameStatus::Playing,
        GameStatus::Completed,
        GameStatus::Dropped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Wishlist => "WISHLIST",
            GameStatus::Backlog => "BACKLOG",
            GameStatus::Playing => "PLAYING",
            GameStatus::Completed => "COMPLETED",
            GameStatus::Dropped => "DROPPED",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = String;

    /// Case-insensitive parse of the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown game status: {}", s))
    }
}

/// A game in a user's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GameEntry {
    /// Server-assigned entry ID
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Owner
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    /// Catalog game
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub game_id: u64,
    pub game_name: String,
    /// Cover image URL
    #[serde(default)]
    pub game_cover: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review: Option<String>,
    /// Hours played
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub is_favourite: bool,
    /// Platforms the user plays this game on
    #[serde(default)]
    pub platforms: Option<Vec<String>>,
    pub status: GameStatus,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub time_started: Option<NaiveDate>,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub time_completed: Option<NaiveDate>,
}

/// Payload for creating a game entry. The server assigns the ID and owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NewGameEntry {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub game_id: u64,
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default)]
    pub is_favourite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub time_started: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub time_completed: Option<NaiveDate>,
}

impl NewGameEntry {
    /// Minimal entry: a game with a status and nothing else.
    pub fn new(game_id: u64, status: GameStatus) -> Self {
        Self {
            game_id,
            status,
            rating: None,
            review: None,
            hours: None,
            is_favourite: false,
            platforms: None,
            time_started: None,
            time_completed: None,
        }
    }
}
