// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! DisplayCase client: track the games you play.
//!
//! This crate provides the client core for the DisplayCase game-tracking
//! service: an authenticated HTTP client with transparent token refresh, a
//! typed API surface, and an entity cache that mirrors server state.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, ErrorKind};
pub use store::Store;
