// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session manager: single source of truth for "is there a usable credential".
//!
//! Handles:
//! - Restore of a persisted session at startup
//! - Login (persist credential, then update in-memory state)
//! - Logout (clear persisted credential, then clear in-memory state)

use crate::error::AppError;
use crate::models::Session;
use crate::storage::{keys, KvStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Owns authentication state and its persistence.
///
/// Concurrent login/logout calls are not serialized beyond the state lock;
/// the UI drives these through single-button interactions.
pub struct SessionManager {
    storage: Arc<KvStore>,
    state: RwLock<Session>,
}

impl SessionManager {
    pub fn new(storage: Arc<KvStore>) -> Self {
        Self {
            storage,
            state: RwLock::new(Session::anonymous()),
        }
    }

    /// Restore a persisted session.
    ///
    /// Runs once at startup. Callers must treat the interval before this
    /// completes as unauthenticated. Only ever transitions logged-out to
    /// logged-in; an already-authenticated in-memory session is returned
    /// unchanged.
    pub async fn restore(&self) -> Session {
        let mut state = self.state.write().await;
        if state.is_logged_in() {
            return state.clone();
        }

        let username = self.storage.get(keys::USERNAME);
        let token = self.storage.get(keys::TOKEN);

        match (username, token) {
            (Some(username), Some(token)) => {
                tracing::info!(username = %username, "Session restored");
                *state = Session::authenticated(token);
            }
            _ => {
                tracing::debug!("No persisted session to restore");
            }
        }

        state.clone()
    }

    /// Persist a credential and mark the session logged in.
    ///
    /// The three storage writes are best-effort sequential; a mid-sequence
    /// failure leaves storage partially written and is not rolled back. The
    /// in-memory session is only updated after all writes succeed.
    pub async fn login(&self, username: &str, token: &str) -> Result<(), AppError> {
        self.storage.set(keys::USERNAME, username).await?;
        self.storage.set(keys::TOKEN, token).await?;
        // New accounts get notification sound on.
        self.storage.set(keys::NOTIFICATION_SOUND, "true").await?;

        let mut state = self.state.write().await;
        *state = Session::authenticated(token);

        tracing::info!(username = %username, "Logged in");
        Ok(())
    }

    /// Remove the persisted credential and clear the in-memory session.
    ///
    /// Idempotent: logging out while already logged out just re-clears
    /// storage. On a storage failure the error is surfaced and in-memory
    /// state is left unchanged.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.storage.remove(keys::USERNAME).await?;
        self.storage.remove(keys::TOKEN).await?;

        let mut state = self.state.write().await;
        *state = Session::anonymous();

        tracing::info!("Logged out");
        Ok(())
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Current bearer token, if logged in.
    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.is_logged_in()
    }
}
