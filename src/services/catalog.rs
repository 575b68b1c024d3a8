// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed DisplayCase API: games, library entries, feeds and Steam import.

use crate::error::{AppError, ErrorKind};
use crate::models::{Activity, Game, GameEntry, NewGameEntry, Page, Review, SteamGame};
use crate::services::api::{DisplayCaseApi, RedirectResponse};
use crate::services::transport::ApiRequest;

/// Catalog search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Free-text name search
    pub query: Option<String>,
}

/// Game entry list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameEntryFilter {
    pub page: Option<u32>,
    pub query: Option<String>,
    pub user_id: Option<u64>,
    pub game_id: Option<u64>,
}

impl GameEntryFilter {
    /// Entries belonging to one user.
    pub fn for_user(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }
}

/// Review list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub game_id: Option<u64>,
    /// Only reviews by users the current user follows (requires a session)
    pub following_only: bool,
    pub page: Option<u32>,
}

impl DisplayCaseApi {
    // ─── Games ───────────────────────────────────────────────────────────────

    pub async fn list_games(&self, query: &GameQuery) -> Result<Page<Game>, AppError> {
        let request = ApiRequest::get("/games")
            .query_opt("page", query.page)
            .query_opt("query", query.query.as_deref())
            .public();
        self.fetch_page(request).await
    }

    pub async fn get_game(&self, game_id: u64) -> Result<Game, AppError> {
        self.fetch(ApiRequest::get(format!("/games/{}", game_id)).public())
            .await
    }

    pub async fn popular_games(&self) -> Result<Vec<Game>, AppError> {
        self.fetch(ApiRequest::get("/games/popular").public()).await
    }

    // ─── Game Entries ────────────────────────────────────────────────────────

    pub async fn list_game_entries(
        &self,
        filter: &GameEntryFilter,
    ) -> Result<Page<GameEntry>, AppError> {
        let request = ApiRequest::get("/game-entries")
            .query_opt("page", filter.page)
            .query_opt("query", filter.query.as_deref())
            .query_opt("user_id", filter.user_id)
            .query_opt("game_id", filter.game_id);
        self.fetch_page(request).await
    }

    pub async fn get_game_entry(&self, entry_id: u64) -> Result<GameEntry, AppError> {
        self.fetch(ApiRequest::get(format!("/game-entries/{}", entry_id)))
            .await
    }

    /// Create an entry; the returned entry carries the server-assigned ID.
    pub async fn create_game_entry(&self, entry: &NewGameEntry) -> Result<GameEntry, AppError> {
        self.fetch(ApiRequest::post("/game-entries").json(entry)?)
            .await
    }

    /// Replace an entry with the full representation given.
    pub async fn update_game_entry(&self, entry: &GameEntry) -> Result<(), AppError> {
        self.execute(ApiRequest::put(format!("/game-entries/{}", entry.id)).json(entry)?)
            .await
    }

    pub async fn delete_game_entry(&self, entry_id: u64) -> Result<(), AppError> {
        self.execute(ApiRequest::delete(format!("/game-entries/{}", entry_id)))
            .await
    }

    // ─── Activity Feeds ──────────────────────────────────────────────────────

    /// A user's own activity feed.
    pub async fn user_activities(
        &self,
        user_id: u64,
        page: Option<u32>,
    ) -> Result<Page<Activity>, AppError> {
        let request = ApiRequest::get(format!("/activities/{}", user_id))
            .query_opt("page", page)
            .public();
        self.fetch_page(request).await
    }

    /// Activities of everyone the current user follows.
    pub async fn timeline(&self, page: Option<u32>) -> Result<Page<Activity>, AppError> {
        self.fetch_page(ApiRequest::get("/timeline").query_opt("page", page))
            .await
    }

    pub async fn reviews(&self, filter: &ReviewFilter) -> Result<Page<Review>, AppError> {
        let mut request = ApiRequest::get("/reviews")
            .query_opt("game_id", filter.game_id)
            .query_opt("page", filter.page);
        if filter.following_only {
            request = request.query("following_only", true);
        } else {
            request = request.public();
        }
        self.fetch_page(request).await
    }

    // ─── Steam Import ────────────────────────────────────────────────────────

    /// URL to send the user to for linking a Steam account.
    pub async fn steam_login_url(&self) -> Result<String, AppError> {
        let redirect: RedirectResponse = self.fetch(ApiRequest::get("/login/steam")).await?;
        Ok(redirect.url)
    }

    /// Games in the linked Steam library. An empty library is an error.
    pub async fn steam_games(&self) -> Result<Vec<SteamGame>, AppError> {
        let games: Vec<SteamGame> = self.fetch(ApiRequest::get("/steam/games")).await?;
        if games.is_empty() {
            return Err(AppError::from_code(
                ErrorKind::NoSteamGames,
                "Steam library is empty or private",
            ));
        }
        Ok(games)
    }

    /// Import the given Steam apps; returns the entries the backend created.
    pub async fn import_steam_games(&self, app_ids: &[u64]) -> Result<Vec<GameEntry>, AppError> {
        let request =
            ApiRequest::post("/steam/games").json(&serde_json::json!({ "app_ids": app_ids }))?;
        self.fetch(request).await
    }
}
