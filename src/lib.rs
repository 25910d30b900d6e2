// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Medtrack: client core for the medical-residency tracking app
//!
//! This crate owns authentication state (login, logout, restore) and
//! subscription entitlement gating for the mobile client; screens, rendering
//! and navigation live in the embedding app.

pub mod config;
pub mod entitlement;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;

use config::Config;
use entitlement::EntitlementGate;
use error::AppError;
use services::{ApiClient, Preferences, PurchasesClient};
use session::SessionManager;
use std::sync::Arc;
use storage::KvStore;

/// Composition root handed to the UI layer.
///
/// Everything is constructor-injected; there are no ambient singletons, so
/// tests can assemble the same pieces around in-memory collaborators.
pub struct AppCore {
    pub config: Config,
    pub storage: Arc<KvStore>,
    pub session: Arc<SessionManager>,
    pub entitlement: EntitlementGate,
    pub preferences: Preferences,
    api: ApiClient,
}

impl AppCore {
    /// Assemble the core from already-constructed collaborators.
    pub fn new(
        config: Config,
        storage: Arc<KvStore>,
        api: ApiClient,
        purchases: PurchasesClient,
    ) -> Self {
        let session = Arc::new(SessionManager::new(storage.clone()));
        let entitlement = EntitlementGate::new(api.clone(), purchases, session.clone());
        let preferences = Preferences::new(storage.clone());

        Self {
            config,
            storage,
            session,
            entitlement,
            preferences,
            api,
        }
    }

    /// Exchange credentials with the backend, then persist the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AppError> {
        let response = self.api.login(email, password).await?;
        self.session.login(email, &response.token).await
    }

    /// Open storage, build the clients, and restore any persisted session.
    ///
    /// A storage file that cannot be opened degrades to an in-memory store
    /// (and therefore a logged-out session) rather than failing startup.
    pub async fn bootstrap(config: Config) -> Result<Self, AppError> {
        let storage = match KvStore::open(&config.storage_path).await {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "Storage unavailable, starting in-memory");
                KvStore::in_memory()
            }
        };
        let storage = Arc::new(storage);

        let api = ApiClient::new(&config)?;
        let purchases = PurchasesClient::new(&config.purchases_api_key, config.api_timeout_secs)?;

        let core = Self::new(config, storage, api, purchases);
        core.session.restore().await;
        Ok(core)
    }
}
