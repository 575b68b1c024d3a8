// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable client-side storage.

pub mod session_store;

pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore};

/// Fixed storage key for the persisted session record.
pub const SESSION_STORAGE_KEY: &str = "displaycase.session";
