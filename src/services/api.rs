// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend REST API client.
//!
//! Handles:
//! - Login (credential exchange for a backend token)
//! - Subscription fetch
//! - Timeout detection (timeouts must stay distinguishable from other
//!   failures so gate checks degrade to "unknown", not a denial)

use crate::config::Config;
use crate::error::AppError;
use crate::models::SubscriptionRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Backend API client.
///
/// The backend authenticates with a `Token <value>` authorization header.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Login request body. Validated client-side before any I/O, matching the
/// login form's checks.
#[derive(Debug, Serialize, Validate)]
struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    password: String,
}

/// Login response from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Subscription fetch response. The subscription object itself may be null
/// or absent for users with no subscription row.
#[derive(Debug, Deserialize)]
struct SubscriptionResponse {
    #[serde(default)]
    subscription: Option<SubscriptionRecord>,
}

/// Error body shape the backend uses for application-level failures.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl ApiClient {
    /// Create a new API client with a fixed request timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Exchange credentials for a backend token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        request
            .validate()
            .map_err(|e| AppError::BadRequest(first_validation_message(&e)))?;

        let url = format!("{}/login/", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        self.check_response_json(response).await
    }

    /// Fetch the current user's subscription record.
    pub async fn get_subscription(
        &self,
        token: &str,
    ) -> Result<Option<SubscriptionRecord>, AppError> {
        let url = format!("{}/get_subscription/", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", token))
            .send()
            .await
            .map_err(request_error)?;

        let body: SubscriptionResponse = self.check_response_json(response).await?;
        Ok(body.subscription)
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 401 {
                return Err(AppError::Unauthorized);
            }

            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or(body);

            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("JSON parse error: {}", e)))
    }
}

/// Map a transport error, keeping timeouts distinguishable.
fn request_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout
    } else {
        AppError::Network(e.to_string())
    }
}

/// First field message out of a validation failure.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|v| v.iter())
        .filter_map(|e| e.message.as_ref())
        .map(|m| m.to_string())
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}
