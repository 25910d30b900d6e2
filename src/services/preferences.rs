// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User preferences persisted in the key-value store.

use crate::error::AppError;
use crate::storage::{keys, KvStore};
use std::sync::Arc;

/// Settings-screen preferences: notification sound and app language.
#[derive(Clone)]
pub struct Preferences {
    storage: Arc<KvStore>,
}

impl Preferences {
    pub fn new(storage: Arc<KvStore>) -> Self {
        Self { storage }
    }

    /// Notification sound preference. Defaults to on; an unreadable stored
    /// value also falls back to on.
    pub fn notification_sound(&self) -> bool {
        match self.storage.get(keys::NOTIFICATION_SOUND) {
            // Stored as JSON boolean text ("true"/"false").
            Some(raw) => serde_json::from_str(&raw).unwrap_or(true),
            None => true,
        }
    }

    pub async fn set_notification_sound(&self, enabled: bool) -> Result<(), AppError> {
        self.storage
            .set(keys::NOTIFICATION_SOUND, if enabled { "true" } else { "false" })
            .await?;
        tracing::debug!(enabled, "Notification sound preference saved");
        Ok(())
    }

    /// Saved app language code ("en", "pt"), if the user ever picked one.
    pub fn app_language(&self) -> Option<String> {
        self.storage.get(keys::APP_LANGUAGE)
    }

    pub async fn set_app_language(&self, code: &str) -> Result<(), AppError> {
        self.storage.set(keys::APP_LANGUAGE, code).await?;
        tracing::debug!(language = %code, "App language preference saved");
        Ok(())
    }
}
