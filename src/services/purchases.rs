// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Purchases provider client (subscription entitlements and offerings).
//!
//! The provider is opaque to this core: we configure it with a user ID,
//! read offerings, and observe purchase success/failure plus the resulting
//! entitlement flag. Everything else (store dialogs, receipts) happens on
//! the provider's side.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_BASE_URL: &str = "https://api.revenuecat.com/v1";

/// Identifier of the entitlement that unlocks premium features.
const PREMIUM_ENTITLEMENT: &str = "premium";

/// Purchases provider client.
pub struct PurchasesClient {
    /// HTTP client; None means mock mode (offline, canned responses).
    http: Option<reqwest::Client>,
    api_key: String,
    base_url: String,
    app_user_id: RwLock<Option<String>>,
    /// Mock mode only: decline every purchase with this provider message.
    mock_decline: Option<String>,
}

/// A purchasable package from the current offering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Package {
    pub identifier: String,
    pub product_id: String,
    /// Localized display price, e.g. "$2.99/month"
    pub price_string: String,
}

/// Offerings exposed to the paywall screen.
#[derive(Debug, Clone, Default)]
pub struct Offerings {
    pub premium: Option<Package>,
}

/// Successful purchase outcome.
#[derive(Debug, Clone)]
pub struct PurchaseConfirmation {
    pub product_id: String,
    /// Entitlement flag reported by the provider after the purchase
    pub entitlement_active: bool,
    pub purchased_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct OfferingsResponse {
    #[serde(default)]
    offerings: Vec<OfferingEntry>,
    #[serde(default)]
    current_offering_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OfferingEntry {
    identifier: String,
    #[serde(default)]
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl PurchasesClient {
    /// Create a new provider client.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http: Some(http),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            app_user_id: RwLock::new(None),
            mock_decline: None,
        })
    }

    /// Create a mock client for testing (offline mode). Purchases succeed.
    pub fn new_mock() -> Self {
        Self {
            http: None,
            api_key: "mock".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            app_user_id: RwLock::new(None),
            mock_decline: None,
        }
    }

    /// Mock client whose purchases are declined with the given provider
    /// message.
    pub fn new_mock_declined(message: &str) -> Self {
        Self {
            mock_decline: Some(message.to_string()),
            ..Self::new_mock()
        }
    }

    /// Bind the provider to a user. Must run before offerings or purchases.
    pub async fn configure(&self, app_user_id: &str) {
        let mut id = self.app_user_id.write().await;
        *id = Some(app_user_id.to_string());
        tracing::debug!(app_user_id = %app_user_id, "Purchases provider configured");
    }

    /// Identify the configured user with the provider (creates the
    /// subscriber on first contact).
    pub async fn log_in(&self) -> Result<(), AppError> {
        let user_id = self.require_user_id().await?;

        let Some(http) = &self.http else {
            return Ok(());
        };

        let url = format!("{}/subscribers/{}", self.base_url, user_id);
        let response = http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Purchase(e.to_string()))?;

        self.check_response(response).await?;
        tracing::info!(app_user_id = %user_id, "Purchases provider log-in complete");
        Ok(())
    }

    /// Fetch the current offerings.
    pub async fn get_offerings(&self) -> Result<Offerings, AppError> {
        let user_id = self.require_user_id().await?;

        let Some(http) = &self.http else {
            return Ok(Offerings {
                premium: Some(mock_premium_package()),
            });
        };

        let url = format!("{}/subscribers/{}/offerings", self.base_url, user_id);
        let response = http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::Purchase(e.to_string()))?;

        let body: OfferingsResponse = self.check_response_json(response).await?;

        let premium = body
            .offerings
            .into_iter()
            .find(|o| Some(&o.identifier) == body.current_offering_id.as_ref())
            .and_then(|o| o.packages.into_iter().next());

        Ok(Offerings { premium })
    }

    /// Purchase a package. On failure the provider's message is returned
    /// verbatim in `AppError::Purchase`.
    pub async fn purchase_package(
        &self,
        package: &Package,
    ) -> Result<PurchaseConfirmation, AppError> {
        let user_id = self.require_user_id().await?;

        let Some(http) = &self.http else {
            if let Some(message) = &self.mock_decline {
                return Err(AppError::Purchase(message.clone()));
            }
            return Ok(PurchaseConfirmation {
                product_id: package.product_id.clone(),
                entitlement_active: true,
                purchased_at: Utc::now(),
            });
        };

        let url = format!("{}/receipts", self.base_url);
        let body = serde_json::json!({
            "app_user_id": user_id,
            "product_id": package.product_id,
        });

        let response = http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Purchase(e.to_string()))?;

        let subscriber: serde_json::Value = self.check_response_json(response).await?;
        let entitlement_active = subscriber
            .pointer(&format!(
                "/subscriber/entitlements/{}/expires_date",
                PREMIUM_ENTITLEMENT
            ))
            .is_some();

        tracing::info!(
            product_id = %package.product_id,
            entitlement_active,
            "Purchase confirmed"
        );

        Ok(PurchaseConfirmation {
            product_id: package.product_id.clone(),
            entitlement_active,
            purchased_at: Utc::now(),
        })
    }

    async fn require_user_id(&self) -> Result<String, AppError> {
        self.app_user_id
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Purchase("Purchases provider not configured".to_string()))
    }

    /// Check response status, surfacing the provider's message verbatim.
    async fn check_response(&self, response: reqwest::Response) -> Result<(), AppError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(self.provider_error(response).await)
    }

    /// Check response and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(self.provider_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Purchase(format!("JSON parse error: {}", e)))
    }

    async fn provider_error(&self, response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| format!("HTTP {}: {}", status, body));
        AppError::Purchase(message)
    }
}

fn mock_premium_package() -> Package {
    Package {
        identifier: "$rc_monthly".to_string(),
        product_id: "premium_monthly".to_string(),
        price_string: "$2.99/month".to_string(),
    }
}
