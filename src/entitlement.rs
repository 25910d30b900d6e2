// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entitlement gate: converts subscription state into an access decision.
//!
//! Every gated feature (surgery edit, document download, profile edit, ...)
//! asks the same question through `check()` instead of re-implementing the
//! branch tree inline.

use crate::error::AppError;
use crate::models::{GateDecision, SubscriptionRecord};
use crate::services::{ApiClient, Package, PurchaseConfirmation, PurchasesClient};
use crate::session::SessionManager;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Decide whether a gated feature may be used.
///
/// Pure and deterministic; never panics. Missing data fails closed to
/// `DenyUnknown`.
///
/// The branch order is load-bearing and must not be reordered: the flags are
/// not mutually exclusive, and `free_trial_end` carries a different reading
/// per branch (inside a trial, true means the trial window is still open;
/// standing alone, true means the trial has ended). Both readings come from
/// the backend's observed behavior and are preserved literally.
pub fn decide(record: Option<&SubscriptionRecord>) -> GateDecision {
    let Some(record) = record else {
        return GateDecision::DenyUnknown;
    };

    if record.free_trial {
        if record.free_trial_end {
            return GateDecision::Allow;
        }
        return GateDecision::DenyTrialExpired;
    }

    if record.free_trial_end {
        return GateDecision::DenyTrialExpired;
    }

    if record.is_active {
        return GateDecision::Allow;
    }

    GateDecision::DenySubscriptionExpired
}

/// Subscription state held by the gate.
#[derive(Debug, Default)]
struct SubscriptionState {
    record: Option<SubscriptionRecord>,
    fetched_at: Option<DateTime<Utc>>,
}

/// Owns the subscription record and answers gate checks for any number of
/// independent call sites.
pub struct EntitlementGate {
    api: ApiClient,
    purchases: PurchasesClient,
    session: Arc<SessionManager>,
    state: RwLock<SubscriptionState>,
}

impl EntitlementGate {
    pub fn new(api: ApiClient, purchases: PurchasesClient, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            purchases,
            session,
            state: RwLock::new(SubscriptionState::default()),
        }
    }

    /// Fetch the subscription record from the backend and replace the held
    /// record wholesale.
    ///
    /// Concurrent fetches are not de-duplicated or cancelled; the last
    /// response to arrive wins. A failed fetch leaves the current record
    /// untouched.
    pub async fn fetch_subscription(&self) -> Result<Option<SubscriptionRecord>, AppError> {
        let token = self.session.token().await.ok_or(AppError::Unauthorized)?;

        let record = self.api.get_subscription(&token).await?;

        let mut state = self.state.write().await;
        state.record = record.clone();
        state.fetched_at = Some(Utc::now());

        tracing::debug!(present = record.is_some(), "Subscription record refreshed");
        Ok(record)
    }

    /// Current subscription record, if one has been fetched.
    pub async fn subscription(&self) -> Option<SubscriptionRecord> {
        self.state.read().await.record.clone()
    }

    /// Gate check over the currently held record.
    pub async fn check(&self) -> GateDecision {
        let state = self.state.read().await;
        let decision = decide(state.record.as_ref());

        if !decision.is_allowed() {
            tracing::debug!(
                decision = ?decision,
                fetched_at = ?state.fetched_at,
                "Gate denied"
            );
        }

        decision
    }

    /// Purchase the given package and optimistically mark the subscription
    /// active.
    ///
    /// The local update is not re-derived from the backend; callers must
    /// reconcile with `fetch_subscription()`. On failure the record is left
    /// untouched and the provider's message is surfaced verbatim.
    pub async fn handle_purchase(
        &self,
        package: &Package,
    ) -> Result<PurchaseConfirmation, AppError> {
        let confirmation = self.purchases.purchase_package(package).await?;

        let mut state = self.state.write().await;
        match state.record.as_mut() {
            Some(record) => record.is_active = true,
            None => {
                state.record = Some(SubscriptionRecord {
                    is_active: true,
                    ..SubscriptionRecord::default()
                });
            }
        }

        tracing::info!(product_id = %confirmation.product_id, "Subscription activated");
        Ok(confirmation)
    }

    /// Premium package from the provider's current offering, for the
    /// paywall screen.
    pub async fn premium_package(&self) -> Result<Option<Package>, AppError> {
        Ok(self.purchases.get_offerings().await?.premium)
    }

    /// Bind the purchases provider to the given user and identify them.
    pub async fn configure_billing(&self, app_user_id: &str) -> Result<(), AppError> {
        self.purchases.configure(app_user_id).await;
        self.purchases.log_in().await
    }
}
