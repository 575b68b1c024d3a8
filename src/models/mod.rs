// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models mirrored from the DisplayCase API.

pub mod activity;
pub mod game;
pub mod game_entry;
pub mod page;
pub mod session;
pub mod stats;
pub mod user;

pub use activity::{Activity, Review};
pub use game::{Game, SteamGame};
pub use game_entry::{GameEntry, GameStatus, NewGameEntry};
pub use page::Page;
pub use session::{Session, TokenPair};
pub use stats::UserStatistics;
pub use user::{Badge, User};
