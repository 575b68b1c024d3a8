// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity feed items and reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::GameStatus;

/// One event in a user's activity feed or the follow timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    /// Who did it
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub username: String,
    #[serde(default)]
    pub profile_picture_link: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub game_id: u64,
    pub game_name: String,
    #[serde(default)]
    pub game_cover: String,
    /// Kind of event, e.g. "STATUS_UPDATE" or "REVIEW"
    pub activity_type: String,
    /// New status, for status updates
    #[serde(default)]
    pub status: Option<GameStatus>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub timestamp: DateTime<Utc>,
}

/// A written review of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Review {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    pub username: String,
    #[serde(default)]
    pub profile_picture_link: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub game_id: u64,
    pub game_name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    pub review: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub timestamp: DateTime<Utc>,
}
