// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entity cache behavior against the mock backend.

use displaycase_client::config::WritePolicy;
use displaycase_client::models::{GameEntry, GameStatus, NewGameEntry};
use displaycase_client::services::{GameEntryFilter, RegisterRequest};
use displaycase_client::store::AuthState;
use displaycase_client::ErrorKind;
use std::sync::atomic::Ordering;

mod common;
use common::{entry_json, MockBackend, TEST_EMAIL, TEST_PASSWORD, TEST_USER_ID};

fn game_entry(id: u64, game_id: u64, status: GameStatus) -> GameEntry {
    serde_json::from_value(entry_json(id, game_id, status.as_str())).unwrap()
}

#[tokio::test]
async fn test_login_then_expired_token_fetch_refreshes_once() {
    let backend = MockBackend::start().await;
    let store = backend.store(WritePolicy::default());
    assert_eq!(store.auth_state(), AuthState::Unauthenticated);

    let user = store.login(TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    assert_eq!(user.username, "player_one");

    let session = store.api().client().current_session().unwrap();
    assert_eq!(session.access_token, "tok1");
    assert_eq!(session.refresh_token, "rtok1");
    assert_eq!(
        store.auth_state(),
        AuthState::Authenticated { user: Some(user) }
    );

    for id in 1..=3 {
        backend.state.put_entry(entry_json(id, 10 + id, "PLAYING"));
    }
    backend.state.expire_access();

    store
        .fetch_game_entries(&GameEntryFilter::for_user(TEST_USER_ID))
        .await
        .unwrap();

    assert_eq!(backend.state.refreshes(), 1);
    assert_eq!(store.game_entries().len(), 3);
    assert!(store.auth_state().is_authenticated());
}

#[tokio::test]
async fn test_fetch_replaces_slice_and_reads_page_count() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::default());
    backend.state.put_entry(entry_json(1, 11, "BACKLOG"));
    backend.state.put_entry(entry_json(2, 12, "PLAYING"));
    backend.state.entry_pages.store(3, Ordering::SeqCst);

    let filter = GameEntryFilter::for_user(TEST_USER_ID);
    let page = store.fetch_game_entries(&filter).await.unwrap();
    assert_eq!(page.pages, 3);
    assert!(page.has_next(1));

    backend.state.entries.lock().unwrap().remove(&1);
    backend.state.put_entry(entry_json(3, 13, "DROPPED"));
    store.fetch_game_entries(&filter).await.unwrap();

    let ids: Vec<u64> = store.game_entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert!(store.game_entry(1).is_none());

    let partition = store.entries_by_status();
    assert_eq!(partition.get(GameStatus::Playing).len(), 1);
    assert_eq!(partition.get(GameStatus::Dropped).len(), 1);
    assert!(partition.get(GameStatus::Backlog).is_empty());
}

#[tokio::test]
async fn test_created_entry_appears_only_after_server_confirms() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::default());
    backend.state.hold_create.store(true, Ordering::SeqCst);

    let new_entry = NewGameEntry::new(42, GameStatus::Wishlist);
    let (created, ()) = tokio::join!(store.create_game_entry(&new_entry), async {
        backend.state.create_started.notified().await;
        assert!(!store.has_game(42), "No optimistic insert");
        assert!(store.game_entries().is_empty());
        backend.state.create_release.notify_one();
    });

    let created = created.unwrap();
    assert_eq!(created.id, 100);
    assert_eq!(store.entry_for_game(42).unwrap().id, 100);
}

#[tokio::test]
async fn test_commands_without_session_make_no_requests() {
    let backend = MockBackend::start().await;
    let store = backend.store(WritePolicy::default());

    let errors = vec![
        store
            .create_game_entry(&NewGameEntry::new(1, GameStatus::Backlog))
            .await
            .unwrap_err(),
        store
            .update_game_entry(game_entry(5, 7, GameStatus::Completed))
            .await
            .unwrap_err(),
        store.delete_game_entry(5).await.unwrap_err(),
        store.update_username("player_two").await.unwrap_err(),
        store.update_bio("Now into roguelikes").await.unwrap_err(),
        store
            .update_profile_picture("me.png", "image/png", vec![0x89, 0x50])
            .await
            .unwrap_err(),
        store.timeline(None).await.unwrap_err(),
        store.follow("someone").await.unwrap_err(),
        store.fetch_self().await.unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.kind(), ErrorKind::AuthRequired, "{}", err);
    }
    assert_eq!(store.restore().await.unwrap(), None);

    assert_eq!(backend.state.resource_requests(), 0);
    assert_eq!(backend.state.refreshes(), 0);
}

#[tokio::test]
async fn test_update_trusts_submitted_values_by_default() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::TrustSubmitted);
    backend.state.put_entry(entry_json(5, 7, "PLAYING"));

    let mut entry = store.fetch_game_entry(5).await.unwrap();
    entry.status = GameStatus::Completed;
    entry.game_name = "Renamed Locally".to_string();

    let committed = store.update_game_entry(entry).await.unwrap();

    assert_eq!(committed.game_name, "Renamed Locally");
    assert_eq!(store.game_entry(5).unwrap().status, GameStatus::Completed);
}

#[tokio::test]
async fn test_update_refetches_when_configured() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::RefetchAfterWrite);
    backend.state.put_entry(entry_json(5, 7, "PLAYING"));

    let mut entry = store.fetch_game_entry(5).await.unwrap();
    entry.status = GameStatus::Completed;
    entry.game_name = "Renamed Locally".to_string();

    let committed = store.update_game_entry(entry).await.unwrap();

    assert_eq!(committed.game_name, "Game 7");
    assert_eq!(committed.status, GameStatus::Completed);
    assert_eq!(store.game_entry(5).unwrap(), committed);
}

#[tokio::test]
async fn test_failed_update_leaves_slice_untouched() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::default());
    backend.state.put_entry(entry_json(5, 7, "PLAYING"));
    store.fetch_game_entry(5).await.unwrap();

    let mut missing = store.game_entry(5).unwrap();
    missing.id = 999;
    assert!(store.update_game_entry(missing).await.is_err());

    assert!(store.game_entry(999).is_none());
    assert_eq!(store.game_entries().len(), 1);
}

#[tokio::test]
async fn test_delete_removes_entry() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::default());
    backend.state.put_entry(entry_json(5, 7, "PLAYING"));
    store.fetch_game_entry(5).await.unwrap();

    store.delete_game_entry(5).await.unwrap();

    assert!(!store.has_game(7));
    assert!(backend.state.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_clears_every_slice() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::default());
    backend.state.put_entry(entry_json(1, 11, "BACKLOG"));

    store.fetch_self().await.unwrap();
    store
        .fetch_game_entries(&GameEntryFilter::for_user(TEST_USER_ID))
        .await
        .unwrap();
    store.fetch_statistics("player_one").await.unwrap();

    store.logout().await.unwrap();

    assert_eq!(store.auth_state(), AuthState::Unauthenticated);
    assert!(store.self_user().is_none());
    assert!(store.game_entries().is_empty());
    assert!(store.statistics("player_one").is_none());
}

#[tokio::test]
async fn test_logout_during_create_discards_late_result() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::default());
    backend.state.hold_create.store(true, Ordering::SeqCst);

    let new_entry = NewGameEntry::new(42, GameStatus::Wishlist);
    let (created, ()) = tokio::join!(store.create_game_entry(&new_entry), async {
        backend.state.create_started.notified().await;
        store.logout().await.unwrap();
        backend.state.create_release.notify_one();
    });

    // The server accepted it, but the session it belonged to is gone
    assert_eq!(created.unwrap().id, 100);
    assert_eq!(store.auth_state(), AuthState::Unauthenticated);
    assert!(store.game_entries().is_empty());
    assert!(!store.has_game(42));

    store.login(TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    assert!(store.game_entries().is_empty());
}

#[tokio::test]
async fn test_revoked_session_resets_cached_state() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::default());
    backend.state.put_entry(entry_json(1, 11, "BACKLOG"));
    store
        .fetch_game_entries(&GameEntryFilter::for_user(TEST_USER_ID))
        .await
        .unwrap();

    backend.state.revoked.store(true, Ordering::SeqCst);
    let err = store.fetch_self().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TokenNotValid);
    assert_eq!(store.auth_state(), AuthState::Unauthenticated);
    assert!(store.game_entries().is_empty());
}

#[tokio::test]
async fn test_backend_error_codes_map_to_kinds() {
    let backend = MockBackend::start().await;
    let store = backend.store(WritePolicy::default());

    let err = store
        .register(&RegisterRequest {
            email: TEST_EMAIL.to_string(),
            username: "player_two".to_string(),
            password: "long enough".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmailInUse);

    let err = store.login(TEST_EMAIL, "wrong").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncorrectLoginDetails);
    assert_eq!(err.notification().title, "Login failed");

    assert!(!store.auth_state().is_authenticated());
}

#[tokio::test]
async fn test_statistics_are_not_updated_by_entry_changes() {
    let backend = MockBackend::start().await;
    let store = backend.logged_in_store(WritePolicy::default());

    let stats = store.fetch_statistics("player_one").await.unwrap();
    assert_eq!(stats.total_games(), 3);
    assert_eq!(stats.top_genre(), Some("RPG"));

    store
        .create_game_entry(&NewGameEntry::new(9, GameStatus::Playing))
        .await
        .unwrap();

    assert_eq!(store.statistics("player_one").unwrap().total_games(), 3);
}
