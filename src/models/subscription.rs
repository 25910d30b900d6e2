// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription record and gate decision types.

use serde::{Deserialize, Serialize};

/// Subscription state as reported by the backend.
///
/// The backend omits fields freely, so every flag defaults to false rather
/// than failing deserialization. The record is fetched on demand, never
/// persisted locally, and overwritten wholesale on each fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Backend user ID the record belongs to
    #[serde(default)]
    pub user: Option<i64>,
    /// Paid subscription currently valid
    #[serde(default)]
    pub is_active: bool,
    /// User is within the free-trial program
    #[serde(default)]
    pub free_trial: bool,
    /// Trial-window flag. The backend's usage is inconsistent: on the allow
    /// path it reads as "trial window still open", on the standalone deny
    /// path as "trial has ended". See `entitlement::decide`.
    #[serde(default)]
    pub free_trial_end: bool,
}

/// Outcome of an entitlement check. Produced fresh on every check, never
/// cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Feature may be used
    Allow,
    /// Free trial no longer grants access
    DenyTrialExpired,
    /// Paid subscription has lapsed
    DenySubscriptionExpired,
    /// Subscription state could not be established (fail closed)
    DenyUnknown,
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }

    /// The message shown to the user when navigation is blocked.
    pub fn user_message(&self) -> &'static str {
        match self {
            GateDecision::Allow => "",
            GateDecision::DenyTrialExpired => {
                "Your free trial has expired. Please upgrade your account to access this feature."
            }
            GateDecision::DenySubscriptionExpired => {
                "Your subscription has expired. Please renew to access this feature."
            }
            GateDecision::DenyUnknown => {
                "Unable to verify your subscription. Please try again later."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_with_all_fields_absent() {
        let record: SubscriptionRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, SubscriptionRecord::default());
        assert!(!record.is_active);
        assert!(!record.free_trial);
        assert!(!record.free_trial_end);
        assert!(record.user.is_none());
    }

    #[test]
    fn test_record_deserializes_backend_shape() {
        let json = r#"{"user": 42, "is_active": true, "free_trial": false, "free_trial_end": true}"#;
        let record: SubscriptionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.user, Some(42));
        assert!(record.is_active);
        assert!(!record.free_trial);
        assert!(record.free_trial_end);
    }
}
