// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Self-user slice.

use crate::models::User;
use std::sync::{PoisonError, RwLock};

/// Where the client is in the login lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// No session.
    Unauthenticated,
    /// A session exists. `user` is `None` until the profile has been fetched.
    Authenticated { user: Option<User> },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }
}

/// The logged-in user's profile.
#[derive(Debug, Default)]
pub struct UserSlice {
    user: RwLock<Option<User>>,
}

impl UserSlice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, user: User) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub fn clear(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
