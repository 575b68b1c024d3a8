// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client entity cache.
//!
//! [`Store`] mirrors three entity families (self user, game entries, user
//! statistics). Reads are synchronous and return copies. Commands go to the
//! backend first and only touch a slice after the server confirms; a failed
//! command leaves every slice as it was. A result that arrives after the
//! session it was requested under has ended is returned but not cached.

pub mod game_entries;
pub mod statistics;
pub mod user;

pub use game_entries::{GameEntrySlice, StatusPartition};
pub use statistics::StatisticsSlice;
pub use user::{AuthState, UserSlice};

use crate::config::{Config, WritePolicy};
use crate::db::FileSessionStore;
use crate::error::AppError;
use crate::models::{
    Activity, Game, GameEntry, NewGameEntry, Page, Review, SteamGame, User, UserStatistics,
};
use crate::services::{
    AuthenticatedClient, DisplayCaseApi, GameEntryFilter, GameQuery, HttpTransport,
    RegisterRequest, ReviewFilter, TracedTransport,
};
use std::sync::{Arc, Mutex, PoisonError};

/// Explicitly constructed client state container.
pub struct Store {
    api: DisplayCaseApi,
    write_policy: WritePolicy,
    user: UserSlice,
    entries: GameEntrySlice,
    statistics: StatisticsSlice,
    /// Held while committing to or resetting the slices.
    commit_lock: Mutex<()>,
}

impl Store {
    /// Build the full production stack from configuration.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let transport = TracedTransport::new(HttpTransport::new(
            &config.api_url,
            config.http_timeout,
        )?);
        let sessions = FileSessionStore::new(&config.session_dir);
        let client = AuthenticatedClient::new(Arc::new(transport), Arc::new(sessions))?;

        Ok(Self::new(
            DisplayCaseApi::new(Arc::new(client)),
            config.write_policy,
        ))
    }

    pub fn new(api: DisplayCaseApi, write_policy: WritePolicy) -> Self {
        Self {
            api,
            write_policy,
            user: UserSlice::new(),
            entries: GameEntrySlice::new(),
            statistics: StatisticsSlice::new(),
            commit_lock: Mutex::new(()),
        }
    }

    /// Direct API access for calls the store does not wrap.
    pub fn api(&self) -> &DisplayCaseApi {
        &self.api
    }

    fn client(&self) -> &AuthenticatedClient {
        self.api.client()
    }

    /// Fail fast, without a network call, when there is no session.
    fn require_session(&self) -> Result<(), AppError> {
        if self.client().is_authenticated() {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    /// Reset all slices if the session turned out to be invalid.
    fn settle<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(e) = &result {
            if e.is_token_error() {
                tracing::info!("Session invalid, resetting cached state");
                self.reset();
            }
        }
        result
    }

    fn generation(&self) -> u64 {
        self.client().session_generation()
    }

    /// Run `commit` unless the session changed since `generation` was read.
    fn commit_if_current(&self, generation: u64, commit: impl FnOnce()) {
        let _guard = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.generation() == generation {
            commit();
        } else {
            tracing::debug!("Dropping result that arrived after the session changed");
        }
    }

    fn reset(&self) {
        let _guard = self.commit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.user.clear();
        self.entries.clear();
        self.statistics.clear();
    }

    // ─── Selectors ───────────────────────────────────────────────────────────

    pub fn auth_state(&self) -> AuthState {
        if self.client().is_authenticated() {
            AuthState::Authenticated {
                user: self.user.get(),
            }
        } else {
            AuthState::Unauthenticated
        }
    }

    pub fn self_user(&self) -> Option<User> {
        self.user.get()
    }

    /// All cached entries, ordered by ID.
    pub fn game_entries(&self) -> Vec<GameEntry> {
        game_entries::sorted_by_id(&self.entries.snapshot())
    }

    pub fn game_entry(&self, entry_id: u64) -> Option<GameEntry> {
        self.entries.get(entry_id)
    }

    pub fn entries_by_status(&self) -> StatusPartition {
        game_entries::partition_by_status(&self.entries.snapshot())
    }

    pub fn entry_for_game(&self, game_id: u64) -> Option<GameEntry> {
        game_entries::find_by_game(&self.entries.snapshot(), game_id)
    }

    pub fn has_game(&self, game_id: u64) -> bool {
        self.entry_for_game(game_id).is_some()
    }

    pub fn favourites(&self) -> Vec<GameEntry> {
        game_entries::favourites(&self.entries.snapshot())
    }

    pub fn statistics(&self, username: &str) -> Option<UserStatistics> {
        self.statistics.get(username)
    }

    // ─── Authentication ──────────────────────────────────────────────────────

    /// Register, then load the new user's profile.
    pub async fn register(&self, form: &RegisterRequest) -> Result<User, AppError> {
        self.api.register(form).await?;
        self.fetch_self().await
    }

    /// Log in, then load the user's profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        self.api.login(email, password).await?;
        tracing::info!("Logged in");
        self.fetch_self().await
    }

    /// Store tokens from the OAuth callback, then load the user's profile.
    pub async fn complete_oauth_login(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<User, AppError> {
        self.api.complete_oauth_login(access_token, refresh_token)?;
        self.fetch_self().await
    }

    /// Resume a persisted session. Returns `None` when logged out.
    pub async fn restore(&self) -> Result<Option<User>, AppError> {
        if !self.client().is_authenticated() {
            return Ok(None);
        }
        self.fetch_self().await.map(Some)
    }

    /// End the session and clear every slice.
    pub async fn logout(&self) -> Result<(), AppError> {
        let result = self.api.logout().await;
        self.reset();
        result
    }

    // ─── Self User ───────────────────────────────────────────────────────────

    pub async fn fetch_self(&self) -> Result<User, AppError> {
        self.require_session()?;
        let generation = self.generation();
        let user = self.settle(self.api.get_self().await)?;
        self.commit_self(generation, user.clone());
        Ok(user)
    }

    pub async fn update_username(&self, username: &str) -> Result<User, AppError> {
        self.require_session()?;
        let generation = self.generation();
        let user = self.settle(self.api.update_username(username).await)?;
        self.commit_self(generation, user.clone());
        Ok(user)
    }

    pub async fn update_bio(&self, bio: &str) -> Result<User, AppError> {
        self.require_session()?;
        let generation = self.generation();
        let user = self.settle(self.api.update_bio(bio).await)?;
        self.commit_self(generation, user.clone());
        Ok(user)
    }

    pub async fn update_profile_picture(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<User, AppError> {
        self.require_session()?;
        let generation = self.generation();
        let user = self.settle(
            self.api
                .update_profile_picture(file_name, content_type, bytes)
                .await,
        )?;
        self.commit_self(generation, user.clone());
        Ok(user)
    }

    fn commit_self(&self, generation: u64, user: User) {
        self.commit_if_current(generation, || self.user.set(user));
    }

    // ─── Other Users (not cached) ────────────────────────────────────────────

    pub async fn fetch_user(&self, username: &str) -> Result<User, AppError> {
        self.settle(self.api.get_user(username).await)
    }

    pub async fn follow(&self, username: &str) -> Result<(), AppError> {
        self.require_session()?;
        self.settle(self.api.follow(username).await)
    }

    pub async fn unfollow(&self, username: &str) -> Result<(), AppError> {
        self.require_session()?;
        self.settle(self.api.unfollow(username).await)
    }

    // ─── Game Entries ────────────────────────────────────────────────────────

    /// Fetch a page of entries and make it the whole slice.
    pub async fn fetch_game_entries(
        &self,
        filter: &GameEntryFilter,
    ) -> Result<Page<GameEntry>, AppError> {
        let generation = self.generation();
        let page = self.settle(self.api.list_game_entries(filter).await)?;
        self.commit_if_current(generation, || self.entries.replace_all(page.items.clone()));
        tracing::debug!(count = page.items.len(), pages = page.pages, "Game entries replaced");
        Ok(page)
    }

    /// Fetch one entry and insert or replace it.
    pub async fn fetch_game_entry(&self, entry_id: u64) -> Result<GameEntry, AppError> {
        let generation = self.generation();
        let entry = self.settle(self.api.get_game_entry(entry_id).await)?;
        self.commit_if_current(generation, || self.entries.upsert(entry.clone()));
        Ok(entry)
    }

    /// Create an entry. It appears in the slice only once the server returns it.
    pub async fn create_game_entry(&self, entry: &NewGameEntry) -> Result<GameEntry, AppError> {
        self.require_session()?;
        let generation = self.generation();
        let created = self.settle(self.api.create_game_entry(entry).await)?;
        self.commit_if_current(generation, || self.entries.upsert(created.clone()));
        tracing::info!(entry_id = created.id, game_id = created.game_id, "Game entry created");
        Ok(created)
    }

    /// Update an entry and commit it according to the write policy.
    pub async fn update_game_entry(&self, entry: GameEntry) -> Result<GameEntry, AppError> {
        self.require_session()?;
        let generation = self.generation();
        self.settle(self.api.update_game_entry(&entry).await)?;

        let committed = match self.write_policy {
            WritePolicy::TrustSubmitted => entry,
            WritePolicy::RefetchAfterWrite => {
                self.settle(self.api.get_game_entry(entry.id).await)?
            }
        };
        self.commit_if_current(generation, || self.entries.upsert(committed.clone()));
        Ok(committed)
    }

    pub async fn delete_game_entry(&self, entry_id: u64) -> Result<(), AppError> {
        self.require_session()?;
        let generation = self.generation();
        self.settle(self.api.delete_game_entry(entry_id).await)?;
        self.commit_if_current(generation, || {
            self.entries.remove(entry_id);
        });
        tracing::info!(entry_id, "Game entry deleted");
        Ok(())
    }

    // ─── Steam Import ────────────────────────────────────────────────────────

    pub async fn steam_login_url(&self) -> Result<String, AppError> {
        self.require_session()?;
        self.settle(self.api.steam_login_url().await)
    }

    pub async fn steam_games(&self) -> Result<Vec<SteamGame>, AppError> {
        self.require_session()?;
        self.settle(self.api.steam_games().await)
    }

    /// Import Steam apps and insert the created entries.
    pub async fn import_steam_games(&self, app_ids: &[u64]) -> Result<Vec<GameEntry>, AppError> {
        self.require_session()?;
        let generation = self.generation();
        let created = self.settle(self.api.import_steam_games(app_ids).await)?;
        self.commit_if_current(generation, || self.entries.upsert_many(created.clone()));
        tracing::info!(count = created.len(), "Steam games imported");
        Ok(created)
    }

    // ─── Statistics ──────────────────────────────────────────────────────────

    pub async fn fetch_statistics(&self, username: &str) -> Result<UserStatistics, AppError> {
        let generation = self.generation();
        let statistics = self.settle(self.api.get_statistics(username).await)?;
        self.commit_if_current(generation, || {
            self.statistics.replace(username, statistics.clone())
        });
        Ok(statistics)
    }

    // ─── Catalog and Feeds (not cached) ──────────────────────────────────────

    pub async fn games(&self, query: &GameQuery) -> Result<Page<Game>, AppError> {
        self.settle(self.api.list_games(query).await)
    }

    pub async fn game(&self, game_id: u64) -> Result<Game, AppError> {
        self.settle(self.api.get_game(game_id).await)
    }

    pub async fn popular_games(&self) -> Result<Vec<Game>, AppError> {
        self.settle(self.api.popular_games().await)
    }

    pub async fn user_activities(
        &self,
        user_id: u64,
        page: Option<u32>,
    ) -> Result<Page<Activity>, AppError> {
        self.settle(self.api.user_activities(user_id, page).await)
    }

    pub async fn timeline(&self, page: Option<u32>) -> Result<Page<Activity>, AppError> {
        self.require_session()?;
        self.settle(self.api.timeline(page).await)
    }

    pub async fn reviews(&self, filter: &ReviewFilter) -> Result<Page<Review>, AppError> {
        if filter.following_only {
            self.require_session()?;
        }
        self.settle(self.api.reviews(filter).await)
    }
}
