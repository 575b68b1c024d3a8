// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated HTTP client.
//!
//! Handles:
//! - Bearer token injection from the current session
//! - Transparent token refresh on 401, then exactly one replay
//! - Single-flight refresh across concurrent requests
//! - Session lifecycle (memory + durable store)

use crate::db::SessionStore;
use crate::error::AppError;
use crate::models::{Session, TokenPair};
use crate::services::transport::{ApiRequest, ApiResponse, Transport};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

/// Refresh endpoint, relative to the API base URL.
pub const REFRESH_PATH: &str = "/tokens/refresh";

/// Client that attaches credentials and recovers from expired access tokens.
///
/// The session lives in memory for fast reads and is mirrored to the
/// [`SessionStore`] on every change.
pub struct AuthenticatedClient {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<Session>>,
    /// Bumped whenever the session identity changes (login or clear).
    generation: AtomicU64,
    /// Serializes refresh operations.
    refresh_lock: Mutex<()>,
}

impl AuthenticatedClient {
    /// Create a client, restoring any session already in `store`.
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, AppError> {
        let session = store.load()?;
        if session.is_some() {
            tracing::info!("Restored persisted session");
        }

        Ok(Self {
            transport,
            store,
            session: RwLock::new(session),
            generation: AtomicU64::new(0),
            refresh_lock: Mutex::new(()),
        })
    }

    // ─── Session Management ──────────────────────────────────────────────────

    /// The current session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Counter that changes on every login and every logout or invalidation.
    ///
    /// A token refresh keeps the same generation. Callers capture it before a
    /// request to detect that the session they started with is gone.
    pub fn session_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a new session, in memory and in durable storage.
    ///
    /// The in-memory session is updated even if persisting fails, so this
    /// process keeps working; the error is still returned.
    pub fn set_session(&self, session: Session) -> Result<(), AppError> {
        let persisted = self.replace_tokens(session);
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = &persisted {
            tracing::warn!(error = %e, "Failed to persist session");
        }
        persisted
    }

    /// Swap in refreshed tokens for the same session.
    fn replace_tokens(&self, session: Session) -> Result<(), AppError> {
        let persisted = self.store.save(&session);
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        persisted
    }

    /// Remove the session from memory and durable storage.
    pub fn clear_session(&self) -> Result<(), AppError> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.store.clear()
    }

    /// Drop the session after the backend reported it invalid.
    pub fn invalidate_session(&self) {
        tracing::info!("Session no longer valid, clearing");
        if let Err(e) = self.clear_session() {
            tracing::warn!(error = %e, "Failed to remove persisted session");
        }
    }

    // ─── Request Pipeline ────────────────────────────────────────────────────

    /// Send a request, refreshing the session and replaying once on 401.
    ///
    /// Non-success statuses are returned as responses; only a failed refresh
    /// (or a 401 with no session to refresh) becomes an error here.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, AppError> {
        let bearer = self.current_session().map(|s| s.access_token);
        let response = self.transport.execute(request, bearer.clone()).await?;

        if response.status != StatusCode::UNAUTHORIZED
            || !request.options.auth_required
            || request.options.skip_auto_refresh
        {
            return Ok(response);
        }

        let Some(rejected) = bearer else {
            return Err(AppError::Unauthorized);
        };

        let session = self.refresh_single_flight(&rejected).await?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            "Replaying request with refreshed token"
        );

        // Exactly one replay; a second 401 goes back to the caller untouched.
        self.transport
            .execute(request, Some(session.access_token))
            .await
    }

    /// Get a session whose access token differs from `rejected`.
    ///
    /// Only one refresh runs at a time. Tasks that queued behind a refresh
    /// re-check the session after acquiring the lock and reuse the result.
    async fn refresh_single_flight(&self, rejected: &str) -> Result<Session, AppError> {
        let _guard = self.refresh_lock.lock().await;

        // Another task may have refreshed (or given up) while we waited.
        let current = self.current_session().ok_or(AppError::InvalidToken)?;
        if current.access_token != rejected {
            return Ok(current);
        }

        tracing::info!("Access token rejected, refreshing session");

        match self.request_refresh(&current.refresh_token).await {
            Ok(session) => {
                // The new tokens are usable even if they could not be stored
                if let Err(e) = self.replace_tokens(session.clone()) {
                    tracing::warn!(error = %e, "Failed to persist refreshed session");
                }
                tracing::info!("Session refreshed");
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, clearing session");
                self.invalidate_session();
                Err(AppError::InvalidToken)
            }
        }
    }

    /// POST the refresh token and parse the new pair.
    async fn request_refresh(&self, refresh_token: &str) -> Result<Session, AppError> {
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&serde_json::json!({ "refresh": refresh_token }))?
            .public()
            .skip_auto_refresh();

        let response = self.transport.execute(&request, None).await?;
        if !response.status.is_success() {
            return Err(AppError::Http {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }

        let pair: TokenPair = serde_json::from_slice(&response.body)
            .map_err(|e| AppError::Decode(format!("Token refresh response: {}", e)))?;
        Ok(pair.into())
    }
}
