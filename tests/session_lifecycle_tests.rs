// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle tests.
//!
//! These tests verify that:
//! 1. A login survives a process restart (fresh manager over the same store)
//! 2. Logout clears the persisted session and is idempotent
//! 3. A failed storage write never flips the in-memory session

use medtrack_core::session::SessionManager;
use medtrack_core::storage::{keys, KvStore};
use std::sync::Arc;

mod common;

#[tokio::test]
async fn test_login_then_restore_in_fresh_instance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let storage = Arc::new(KvStore::open(&path).await.unwrap());
    let manager = SessionManager::new(storage);
    manager.login("resident@example.com", "tok_abc123").await.unwrap();

    // Fresh store + manager simulates a process restart.
    let storage = Arc::new(KvStore::open(&path).await.unwrap());
    let manager = SessionManager::new(storage);
    let session = manager.restore().await;

    assert!(session.is_logged_in());
    assert_eq!(session.token.as_deref(), Some("tok_abc123"));
}

#[tokio::test]
async fn test_logout_then_restore_is_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let storage = Arc::new(KvStore::open(&path).await.unwrap());
    let manager = SessionManager::new(storage);
    manager.login("resident@example.com", "tok_abc123").await.unwrap();
    manager.logout().await.unwrap();

    let storage = Arc::new(KvStore::open(&path).await.unwrap());
    let manager = SessionManager::new(storage);
    let session = manager.restore().await;

    assert!(!session.is_logged_in());
    assert!(session.token.is_none());
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let storage = common::test_storage();
    let manager = SessionManager::new(storage.clone());
    manager.login("resident@example.com", "tok_abc123").await.unwrap();

    manager.logout().await.unwrap();
    let first = manager.session().await;

    manager.logout().await.unwrap();
    let second = manager.session().await;

    assert_eq!(first, second);
    assert!(!second.is_logged_in());
    assert!(storage.get(keys::TOKEN).is_none());
}

#[tokio::test]
async fn test_restore_with_partial_storage_is_logged_out() {
    let storage = common::test_storage();
    // Token without username: treated as no session.
    storage.set(keys::TOKEN, "orphan_token").await.unwrap();

    let manager = SessionManager::new(storage);
    let session = manager.restore().await;

    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn test_failed_login_leaves_memory_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    // The directory itself as the backing "file": reads fail softly at
    // open, writes fail hard.
    let storage = Arc::new(KvStore::open(dir.path()).await.unwrap());
    let manager = SessionManager::new(storage);

    let result = manager.login("resident@example.com", "tok_abc123").await;

    assert!(result.is_err());
    assert!(!manager.is_logged_in().await);
    assert!(manager.token().await.is_none());
}

#[tokio::test]
async fn test_failed_logout_leaves_memory_logged_in() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let storage = Arc::new(KvStore::open(&path).await.unwrap());
    let manager = SessionManager::new(storage);
    manager.login("resident@example.com", "tok_abc123").await.unwrap();

    // Make subsequent writes fail by replacing the file with a directory.
    tokio::fs::remove_file(&path).await.unwrap();
    tokio::fs::create_dir(&path).await.unwrap();

    let result = manager.logout().await;

    assert!(result.is_err());
    assert!(manager.is_logged_in().await);
}

#[tokio::test]
async fn test_restore_never_downgrades_live_session() {
    let storage = common::test_storage();
    let manager = SessionManager::new(storage.clone());
    manager.login("resident@example.com", "tok_abc123").await.unwrap();

    // Persisted copy disappears out from under the live session.
    storage.remove(keys::USERNAME).await.unwrap();
    storage.remove(keys::TOKEN).await.unwrap();

    let session = manager.restore().await;

    assert!(session.is_logged_in());
    assert_eq!(session.token.as_deref(), Some("tok_abc123"));
}

#[tokio::test]
async fn test_login_writes_default_notification_preference() {
    let storage = common::test_storage();
    let manager = SessionManager::new(storage.clone());
    manager.login("resident@example.com", "tok_abc123").await.unwrap();

    assert_eq!(storage.get(keys::USERNAME).as_deref(), Some("resident@example.com"));
    assert_eq!(storage.get(keys::TOKEN).as_deref(), Some("tok_abc123"));
    assert_eq!(storage.get(keys::NOTIFICATION_SOUND).as_deref(), Some("true"));
}
