// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key-value storage layer.

pub mod kv;

pub use kv::KvStore;

/// Storage key names as constants.
pub mod keys {
    pub const USERNAME: &str = "username";
    pub const TOKEN: &str = "token";
    pub const NOTIFICATION_SOUND: &str = "notificationSound";
    pub const APP_LANGUAGE: &str = "appLanguage";
}
