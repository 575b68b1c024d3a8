// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the DisplayCase backend.
//!
//! Serves just enough of the API for client tests, with counters and switches
//! to script expiry, refresh failures and slow responses.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use displaycase_client::config::WritePolicy;
use displaycase_client::db::{MemorySessionStore, SessionStore};
use displaycase_client::models::Session;
use displaycase_client::services::{AuthenticatedClient, DisplayCaseApi, HttpTransport};
use displaycase_client::Store;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const TEST_EMAIL: &str = "a@b.com";
pub const TEST_PASSWORD: &str = "secret";
pub const TEST_USER_ID: u64 = 1;

/// Shared state of the mock backend.
#[derive(Default)]
pub struct MockState {
    /// Access token the backend currently accepts
    pub valid_access: Mutex<String>,
    /// Number of /tokens/refresh calls
    pub refresh_calls: AtomicUsize,
    /// Number of requests to authenticated resource endpoints
    pub resource_calls: AtomicUsize,
    /// Bearer tokens seen on resource endpoints, in arrival order
    pub seen_bearers: Mutex<Vec<Option<String>>>,
    /// Delay before answering a refresh
    pub refresh_delay_ms: AtomicU64,
    /// Answer every refresh with 401
    pub refresh_fails: AtomicBool,
    /// Reject every bearer, even freshly issued ones
    pub reject_all: AtomicBool,
    /// Answer resource endpoints with a TOKEN_NOT_VALID payload
    pub revoked: AtomicBool,
    /// Hold POST /game-entries until `create_release` fires
    pub hold_create: AtomicBool,
    pub create_started: Notify,
    pub create_release: Notify,
    /// Server-side game entries keyed by ID
    pub entries: Mutex<BTreeMap<u64, Value>>,
    /// Value of the `pages` header on entry lists
    pub entry_pages: AtomicU64,
    tokens_issued: AtomicUsize,
    next_entry_id: AtomicU64,
}

impl MockState {
    /// Make the current access token stale, as if it had expired.
    #[allow(dead_code)]
    pub fn expire_access(&self) {
        *self.valid_access.lock().unwrap() = String::new();
    }

    #[allow(dead_code)]
    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn resource_requests(&self) -> usize {
        self.resource_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn put_entry(&self, entry: Value) {
        let id = entry["id"].as_u64().unwrap();
        self.entries.lock().unwrap().insert(id, entry);
    }

    fn issue_tokens(&self) -> Value {
        let n = self.tokens_issued.fetch_add(1, Ordering::SeqCst) + 1;
        let access = format!("tok{}", n);
        *self.valid_access.lock().unwrap() = access.clone();
        json!({ "access": access, "refresh": format!("rtok{}", n) })
    }

    /// Count the request and check its bearer token.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        self.resource_calls.fetch_add(1, Ordering::SeqCst);

        let bearer = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);
        self.seen_bearers.lock().unwrap().push(bearer.clone());

        if self.revoked.load(Ordering::SeqCst) {
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "error_code": "TOKEN_NOT_VALID", "error_message": "revoked" })),
            )
                .into_response());
        }

        let valid = self.valid_access.lock().unwrap().clone();
        match bearer {
            Some(token)
                if !valid.is_empty() && token == valid && !self.reject_all.load(Ordering::SeqCst) =>
            {
                Ok(())
            }
            _ => Err((StatusCode::UNAUTHORIZED, "Unauthorized").into_response()),
        }
    }
}

/// A running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            entry_pages: AtomicU64::new(1),
            next_entry_id: AtomicU64::new(100),
            ..MockState::default()
        });

        let app = Router::new()
            .route("/login", post(login))
            .route("/register", post(register))
            .route("/logout", post(logout))
            .route("/tokens/refresh", post(refresh))
            .route("/user", get(get_self))
            .route("/users/{username}", get(get_user))
            .route("/users/{username}/statistics", get(get_statistics))
            .route("/game-entries", get(list_entries).post(create_entry))
            .route(
                "/game-entries/{id}",
                get(get_entry).put(update_entry).delete(delete_entry),
            )
            .route("/timeline", get(timeline))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock backend failed");
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// API client against this backend using the given session store.
    #[allow(dead_code)]
    pub fn api_with(&self, sessions: Arc<dyn SessionStore>) -> DisplayCaseApi {
        let transport = HttpTransport::new(&self.url(), Duration::from_secs(5))
            .expect("Failed to build transport");
        let client = AuthenticatedClient::new(Arc::new(transport), sessions)
            .expect("Failed to build client");
        DisplayCaseApi::new(Arc::new(client))
    }

    /// Logged-out API client with in-memory session storage.
    #[allow(dead_code)]
    pub fn api(&self) -> DisplayCaseApi {
        self.api_with(Arc::new(MemorySessionStore::new()))
    }

    /// Logged-out store with in-memory session storage.
    #[allow(dead_code)]
    pub fn store(&self, write_policy: WritePolicy) -> Store {
        Store::new(self.api(), write_policy)
    }

    /// Store that already holds a session the backend accepts.
    #[allow(dead_code)]
    pub fn logged_in_store(&self, write_policy: WritePolicy) -> Store {
        let tokens = self.state.issue_tokens();
        let session = Session::new(
            tokens["access"].as_str().unwrap(),
            tokens["refresh"].as_str().unwrap(),
        );
        let sessions = Arc::new(MemorySessionStore::with_session(session));
        Store::new(self.api_with(sessions), write_policy)
    }
}

/// Server representation of a game entry.
#[allow(dead_code)]
pub fn entry_json(id: u64, game_id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": TEST_USER_ID,
        "game_id": game_id,
        "game_name": format!("Game {}", game_id),
        "game_cover": "",
        "rating": null,
        "review": null,
        "hours": null,
        "is_favourite": false,
        "platforms": null,
        "status": status,
        "time_started": null,
        "time_completed": null
    })
}

fn self_user() -> Value {
    json!({
        "id": TEST_USER_ID,
        "username": "player_one",
        "bio": "Mostly RPGs",
        "profile_picture_link": "",
        "is_following": false,
        "badges": [{ "id": 1, "name": "Completionist", "description": "" }]
    })
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["email"] == TEST_EMAIL && body["password"] == TEST_PASSWORD {
        Json(state.issue_tokens()).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error_code": "INCORRECT_LOGIN_DETAILS",
                "error_message": "Incorrect email or password"
            })),
        )
            .into_response()
    }
}

async fn register(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["email"] == TEST_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error_code": "EMAIL_IN_USE", "error_message": "Email taken" })),
        )
            .into_response();
    }
    Json(state.issue_tokens()).into_response()
}

async fn logout() -> StatusCode {
    StatusCode::OK
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if state.refresh_fails.load(Ordering::SeqCst) || body["refresh"].as_str().is_none() {
        return (StatusCode::UNAUTHORIZED, "Refresh token expired").into_response();
    }
    Json(state.issue_tokens()).into_response()
}

async fn get_self(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = state.authorize(&headers) {
        return rejection;
    }
    Json(self_user()).into_response()
}

async fn get_user(Path(username): Path<String>) -> Response {
    if username == "private" {
        return (StatusCode::UNAUTHORIZED, "Profile is private").into_response();
    }
    Json(json!({ "id": 2, "username": username, "is_following": false })).into_response()
}

async fn get_statistics(Path(_username): Path<String>) -> Response {
    Json(json!({
        "average_rating": 8.0,
        "game_status_distribution": { "PLAYING": 1, "COMPLETED": 2 },
        "game_genre_distribution": { "RPG": 2, "Puzzle": 1 },
        "platform_distribution": { "PC": 3 }
    }))
    .into_response()
}

async fn list_entries(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = state.authorize(&headers) {
        return rejection;
    }
    let entries: Vec<Value> = state.entries.lock().unwrap().values().cloned().collect();
    let pages = state.entry_pages.load(Ordering::SeqCst).to_string();
    ([("pages", pages)], Json(entries)).into_response()
}

async fn get_entry(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if let Err(rejection) = state.authorize(&headers) {
        return rejection;
    }
    match state.entries.lock().unwrap().get(&id) {
        Some(entry) => Json(entry.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "No such entry").into_response(),
    }
}

async fn create_entry(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = state.authorize(&headers) {
        return rejection;
    }
    if state.hold_create.load(Ordering::SeqCst) {
        state.create_started.notify_one();
        state.create_release.notified().await;
    }

    let id = state.next_entry_id.fetch_add(1, Ordering::SeqCst);
    let game_id = body["game_id"].as_u64().unwrap_or_default();
    let status = body["status"].as_str().unwrap_or("BACKLOG");
    let entry = entry_json(id, game_id, status);
    state.put_entry(entry.clone());
    (StatusCode::CREATED, Json(entry)).into_response()
}

/// Applies an update, but the catalog owns `game_name`.
async fn update_entry(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(rejection) = state.authorize(&headers) {
        return rejection;
    }
    let mut entries = state.entries.lock().unwrap();
    let Some(existing) = entries.get(&id) else {
        return (StatusCode::NOT_FOUND, "No such entry").into_response();
    };
    body["game_name"] = existing["game_name"].clone();
    entries.insert(id, body);
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_entry(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if let Err(rejection) = state.authorize(&headers) {
        return rejection;
    }
    state.entries.lock().unwrap().remove(&id);
    StatusCode::NO_CONTENT.into_response()
}

async fn timeline(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(rejection) = state.authorize(&headers) {
        return rejection;
    }
    (StatusCode::SERVICE_UNAVAILABLE, "Feed temporarily unavailable").into_response()
}
