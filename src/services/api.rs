// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed DisplayCase API: authentication and users.
//!
//! Catalog, library and feed endpoints live in `services::catalog` as a
//! second `impl` block on the same type.

use crate::error::{AppError, ErrorKind};
use crate::models::{Page, Session, TokenPair, User, UserStatistics};
use crate::services::client::AuthenticatedClient;
use crate::services::transport::{ApiRequest, ApiResponse, FilePart};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError, ValidationErrors};

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 30;

/// Registration form.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// `{ "url": … }` body returned by redirect-style login endpoints.
#[derive(Deserialize)]
pub(crate) struct RedirectResponse {
    pub(crate) url: String,
}

/// Application error body. Some endpoints send it with a 200 status.
#[derive(Deserialize)]
struct ErrorPayload {
    error_code: ErrorKind,
    #[serde(default)]
    error_message: String,
}

/// Usernames are 3-30 ASCII letters, digits or underscores.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::new("username_length"));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::new("username_charset"));
    }
    Ok(())
}

fn validation_error(errors: &ValidationErrors) -> AppError {
    let fields = errors.field_errors();
    if fields.contains_key("username") {
        AppError::from_code(ErrorKind::InvalidUsername, errors.to_string())
    } else if fields.contains_key("password") {
        AppError::from_code(ErrorKind::InvalidPassword, errors.to_string())
    } else {
        AppError::BadRequest(errors.to_string())
    }
}

/// Percent-encode a single path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// DisplayCase API client.
#[derive(Clone)]
pub struct DisplayCaseApi {
    client: Arc<AuthenticatedClient>,
}

impl DisplayCaseApi {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    /// The underlying authenticated client (session access).
    pub fn client(&self) -> &Arc<AuthenticatedClient> {
        &self.client
    }

    // ─── Response Handling ───────────────────────────────────────────────────

    /// Send and decode a JSON response.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, AppError> {
        let response = self.client.send(&request).await?;
        self.decode(&response)
    }

    /// Send and decode a paginated list; page count comes from the `pages` header.
    pub(crate) async fn fetch_page<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Page<T>, AppError> {
        let response = self.client.send(&request).await?;
        let items = self.decode(&response)?;
        Ok(Page {
            items,
            pages: response.header_u32("pages").unwrap_or(1),
        })
    }

    /// Send a request whose response body is not needed.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<(), AppError> {
        let response = self.client.send(&request).await?;
        self.check(&response)
    }

    fn decode<T: DeserializeOwned>(&self, response: &ApiResponse) -> Result<T, AppError> {
        self.check(response)?;
        serde_json::from_slice(&response.body)
            .map_err(|e| AppError::Decode(format!("JSON parse error: {}", e)))
    }

    /// Turn error payloads and non-success statuses into errors.
    fn check(&self, response: &ApiResponse) -> Result<(), AppError> {
        if let Ok(payload) = serde_json::from_slice::<ErrorPayload>(&response.body) {
            let err = AppError::from_code(payload.error_code, payload.error_message);
            if err.is_token_error() {
                self.client.invalidate_session();
            }
            return Err(err);
        }

        if !response.status.is_success() {
            return Err(AppError::Http {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }

        Ok(())
    }

    // ─── Authentication ──────────────────────────────────────────────────────

    /// Create an account and store the returned session.
    pub async fn register(&self, form: &RegisterRequest) -> Result<Session, AppError> {
        form.validate().map_err(|e| validation_error(&e))?;

        let request = ApiRequest::post("/register").json(form)?.public();
        let pair: TokenPair = self.fetch(request).await?;
        self.store_session(pair.into())
    }

    /// Log in with email and password and store the returned session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let request = ApiRequest::post("/login")
            .json(&LoginRequest { email, password })?
            .public();
        let pair: TokenPair = self.fetch(request).await?;
        self.store_session(pair.into())
    }

    /// URL to send the user to for Google sign-in.
    pub async fn google_login_url(&self) -> Result<String, AppError> {
        let redirect: RedirectResponse = self.fetch(ApiRequest::get("/login/google").public()).await?;
        Ok(redirect.url)
    }

    /// Store the token pair delivered to the OAuth callback.
    pub fn complete_oauth_login(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<Session, AppError> {
        if access_token.is_empty() || refresh_token.is_empty() {
            return Err(AppError::BadRequest(
                "OAuth callback is missing tokens".to_string(),
            ));
        }
        self.store_session(Session::new(access_token, refresh_token))
    }

    fn store_session(&self, session: Session) -> Result<Session, AppError> {
        self.client.set_session(session.clone())?;
        tracing::info!("Session established");
        Ok(session)
    }

    /// Revoke the refresh token server-side, then forget the session.
    ///
    /// The local session is always removed; a failed server call is only logged.
    pub async fn logout(&self) -> Result<(), AppError> {
        if let Some(session) = self.client.current_session() {
            let request = ApiRequest::post("/logout")
                .json(&serde_json::json!({ "refresh": session.refresh_token }))?
                .skip_auto_refresh();
            if let Err(e) = self.execute(request).await {
                tracing::warn!(error = %e, "Server-side logout failed");
            }
        }

        self.client.clear_session()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Ask the backend whether the current access token is still accepted.
    ///
    /// Returns `Ok(false)` when there is no session or the token is rejected.
    pub async fn verify_session(&self) -> Result<bool, AppError> {
        let Some(session) = self.client.current_session() else {
            return Ok(false);
        };

        let request = ApiRequest::post("/tokens/verify")
            .json(&serde_json::json!({ "token": session.access_token }))?
            .public()
            .skip_auto_refresh();
        let response = self.client.send(&request).await?;

        match response.status {
            status if status.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED => Ok(false),
            status => Err(AppError::Http {
                status: status.as_u16(),
                body: response.text(),
            }),
        }
    }

    // ─── Users ───────────────────────────────────────────────────────────────

    /// The logged-in user.
    pub async fn get_self(&self) -> Result<User, AppError> {
        self.fetch(ApiRequest::get("/user")).await
    }

    pub async fn update_username(&self, username: &str) -> Result<User, AppError> {
        validate_username(username).map_err(|e| {
            AppError::from_code(ErrorKind::InvalidUsername, e.code.to_string())
        })?;
        let request = ApiRequest::patch("/user").json(&serde_json::json!({ "username": username }))?;
        self.fetch(request).await
    }

    pub async fn update_bio(&self, bio: &str) -> Result<User, AppError> {
        let request = ApiRequest::patch("/user").json(&serde_json::json!({ "bio": bio }))?;
        self.fetch(request).await
    }

    /// Upload a new profile picture (multipart field `picture`).
    pub async fn update_profile_picture(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<User, AppError> {
        let request = ApiRequest::patch("/user").multipart(vec![FilePart {
            field: "picture".to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }]);
        self.fetch(request).await
    }

    /// Another user's profile. Works logged out; `is_following` needs a session.
    pub async fn get_user(&self, username: &str) -> Result<User, AppError> {
        self.fetch(ApiRequest::get(format!("/users/{}", segment(username))).public())
            .await
    }

    pub async fn follow(&self, username: &str) -> Result<(), AppError> {
        self.execute(ApiRequest::post(format!("/follows/{}", segment(username))))
            .await
    }

    pub async fn unfollow(&self, username: &str) -> Result<(), AppError> {
        self.execute(ApiRequest::delete(format!("/follows/{}", segment(username))))
            .await
    }

    /// Aggregate statistics for a user's library.
    pub async fn get_statistics(&self, username: &str) -> Result<UserStatistics, AppError> {
        self.fetch(
            ApiRequest::get(format!("/users/{}/statistics", segment(username))).public(),
        )
        .await
    }
}
