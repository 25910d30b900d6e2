// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - thin typed clients for external collaborators.

pub mod api;
pub mod preferences;
pub mod purchases;

pub use api::{ApiClient, LoginResponse};
pub use preferences::Preferences;
pub use purchases::{Offerings, Package, PurchaseConfirmation, PurchasesClient};
