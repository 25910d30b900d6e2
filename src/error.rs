// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing messages.

/// Application error type shared by all core operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Purchase failed: {0}")]
    Purchase(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for request timeouts. Callers feeding a gate check must treat a
    /// timeout as "unknown", never as a denial.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Timeout)
    }

    /// Message suitable for showing to the user.
    ///
    /// API and purchase-provider messages pass through verbatim; storage and
    /// internal errors collapse to a generic retry message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Please log in to continue.".to_string(),
            AppError::Timeout => {
                "Request timed out. Please check your internet connection.".to_string()
            }
            AppError::Network(_) => {
                "Network error. Please check your internet connection.".to_string()
            }
            AppError::Api { message, .. } => message.clone(),
            AppError::Purchase(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                "Something went wrong. Please try again.".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, AppError>;
