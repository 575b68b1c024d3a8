//! User model for the API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A DisplayCase user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub username: String,
    /// Free-text profile bio
    #[serde(default)]
    pub bio: Option<String>,
    /// Profile picture URL
    #[serde(default)]
    pub profile_picture_link: String,
    /// Whether the current user follows this user (always false for self)
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

/// Achievement badge shown on a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Badge {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
