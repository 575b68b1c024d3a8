// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with a fixed, user-presentable taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Error kinds surfaced uniformly to callers.
///
/// Backend application errors carry one of these as `error_code`; codes this
/// client does not know deserialize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ErrorKind {
    ServerConnectionFailed,
    UsernameInUse,
    EmailInUse,
    IncorrectLoginDetails,
    InvalidUsername,
    InvalidPassword,
    TokenNotValid,
    NoSteamGames,
    AuthRequired,
    #[serde(other)]
    Unknown,
}

/// Title/message pair shown when an operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub message: &'static str,
}

impl ErrorKind {
    /// Wire code, as sent by the backend.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::ServerConnectionFailed => "SERVER_CONNECTION_FAILED",
            ErrorKind::UsernameInUse => "USERNAME_IN_USE",
            ErrorKind::EmailInUse => "EMAIL_IN_USE",
            ErrorKind::IncorrectLoginDetails => "INCORRECT_LOGIN_DETAILS",
            ErrorKind::InvalidUsername => "INVALID_USERNAME",
            ErrorKind::InvalidPassword => "INVALID_PASSWORD",
            ErrorKind::TokenNotValid => "TOKEN_NOT_VALID",
            ErrorKind::NoSteamGames => "NO_STEAM_GAMES",
            ErrorKind::AuthRequired => "AUTH_REQUIRED",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }

    /// Fixed human-readable text for this kind.
    pub fn notification(self) -> Notification {
        let (title, message) = match self {
            ErrorKind::ServerConnectionFailed => (
                "Connection failed",
                "Could not reach the DisplayCase server. Check your connection and try again.",
            ),
            ErrorKind::UsernameInUse => (
                "Username taken",
                "That username is already in use. Please choose another.",
            ),
            ErrorKind::EmailInUse => (
                "Email in use",
                "An account with that email address already exists.",
            ),
            ErrorKind::IncorrectLoginDetails => (
                "Login failed",
                "The email or password you entered is incorrect.",
            ),
            ErrorKind::InvalidUsername => (
                "Invalid username",
                "Usernames must be 3 to 30 characters of letters, numbers or underscores.",
            ),
            ErrorKind::InvalidPassword => (
                "Invalid password",
                "Passwords must be at least 8 characters long.",
            ),
            ErrorKind::TokenNotValid => (
                "Session expired",
                "Your session has expired. Please log in again.",
            ),
            ErrorKind::NoSteamGames => (
                "No Steam games",
                "We couldn't find any games in your Steam library. Is your profile public?",
            ),
            ErrorKind::AuthRequired => ("Login required", "You need to be logged in to do that."),
            ErrorKind::Unknown => (
                "Something went wrong",
                "An unexpected error occurred. Please try again later.",
            ),
        };
        Notification { title, message }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Application error type returned by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{kind}: {message}")]
    Api { kind: ErrorKind, message: String },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Server connection failed: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build an application error from a backend `error_code`.
    ///
    /// `TOKEN_NOT_VALID` always becomes [`AppError::InvalidToken`] so callers
    /// only have one variant to match for session loss.
    pub fn from_code(kind: ErrorKind, message: impl Into<String>) -> Self {
        match kind {
            ErrorKind::TokenNotValid => AppError::InvalidToken,
            ErrorKind::AuthRequired => AppError::Unauthorized,
            kind => AppError::Api {
                kind,
                message: message.into(),
            },
        }
    }

    /// Map this error into the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized => ErrorKind::AuthRequired,
            AppError::InvalidToken => ErrorKind::TokenNotValid,
            AppError::Api { kind, .. } => *kind,
            AppError::Connection(_) => ErrorKind::ServerConnectionFailed,
            AppError::BadRequest(_)
            | AppError::Http { .. }
            | AppError::Decode(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => ErrorKind::Unknown,
        }
    }

    /// Whether this error means the session is gone and the caller must log in again.
    pub fn is_token_error(&self) -> bool {
        matches!(self, AppError::InvalidToken)
    }

    /// Notification text for this error.
    pub fn notification(&self) -> Notification {
        self.kind().notification()
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;
