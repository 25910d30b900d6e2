// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Medtrack smoke client
//!
//! Small development binary that drives the client core end-to-end against
//! the real backend: restore, login, logout, gate check, purchase.

use medtrack_core::{config::Config, AppCore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(api = %config.api_base_url, "Starting medtrack smoke client");

    let core = AppCore::bootstrap(config).await?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("status");

    match command {
        "status" => {
            let session = core.session.session().await;
            println!("logged in: {}", session.is_logged_in());
            println!(
                "notification sound: {}",
                core.preferences.notification_sound()
            );
            if let Some(lang) = core.preferences.app_language() {
                println!("language: {}", lang);
            }
        }
        "login" => {
            let (email, password) = match (args.get(1), args.get(2)) {
                (Some(e), Some(p)) => (e.clone(), p.clone()),
                _ => {
                    eprintln!("usage: medtrack-core login <email> <password>");
                    std::process::exit(2);
                }
            };
            match core.login(&email, &password).await {
                Ok(()) => println!("logged in as {}", email),
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
        "logout" => match core.session.logout().await {
            Ok(()) => println!("logged out"),
            Err(e) => {
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        },
        "gate" => {
            if let Err(e) = core.entitlement.fetch_subscription().await {
                tracing::warn!(error = %e, "Subscription fetch failed");
            }
            let decision = core.entitlement.check().await;
            if decision.is_allowed() {
                println!("allowed");
            } else {
                println!("denied: {}", decision.user_message());
            }
        }
        "buy" => {
            match core.storage.get(medtrack_core::storage::keys::USERNAME) {
                Some(username) => {
                    if let Err(e) = core.entitlement.configure_billing(&username).await {
                        eprintln!("{}", e.user_message());
                        std::process::exit(1);
                    }
                }
                None => {
                    eprintln!("Please log in to continue.");
                    std::process::exit(1);
                }
            }
            let package = match core.entitlement.premium_package().await {
                Ok(Some(p)) => p,
                Ok(None) => {
                    eprintln!("no premium package on offer");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    std::process::exit(1);
                }
            };
            println!("purchasing {} ({})", package.identifier, package.price_string);
            match core.entitlement.handle_purchase(&package).await {
                Ok(confirmation) => println!("purchased {}", confirmation.product_id),
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
        other => {
            eprintln!("unknown command: {}", other);
            eprintln!("usage: medtrack-core [status|login|logout|gate|buy]");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Initialize structured logging.
fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medtrack_core=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
