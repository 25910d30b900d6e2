// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use medtrack_core::config::Config;
use medtrack_core::entitlement::EntitlementGate;
use medtrack_core::services::{ApiClient, Package, PurchasesClient};
use medtrack_core::session::SessionManager;
use medtrack_core::storage::KvStore;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// In-memory storage (no disk).
#[allow(dead_code)]
pub fn test_storage() -> Arc<KvStore> {
    Arc::new(KvStore::in_memory())
}

/// Session manager over in-memory storage.
#[allow(dead_code)]
pub fn test_session() -> Arc<SessionManager> {
    Arc::new(SessionManager::new(test_storage()))
}

/// API client pointed at the given base URL (test default config otherwise).
#[allow(dead_code)]
pub fn test_api(base_url: &str) -> ApiClient {
    let config = Config {
        api_base_url: base_url.to_string(),
        ..Config::default()
    };
    ApiClient::new(&config).expect("API client should build")
}

/// Gate with an offline mock purchases provider. The API client points at
/// `base_url`; tests that never fetch can pass the test-default URL.
#[allow(dead_code)]
pub fn test_gate(session: Arc<SessionManager>, base_url: &str) -> EntitlementGate {
    EntitlementGate::new(test_api(base_url), PurchasesClient::new_mock(), session)
}

/// Gate whose mock purchases provider declines with the given message.
#[allow(dead_code)]
pub fn test_gate_declined(
    session: Arc<SessionManager>,
    base_url: &str,
    message: &str,
) -> EntitlementGate {
    EntitlementGate::new(
        test_api(base_url),
        PurchasesClient::new_mock_declined(message),
        session,
    )
}

/// The package the mock provider offers.
#[allow(dead_code)]
pub fn premium_package() -> Package {
    Package {
        identifier: "$rc_monthly".to_string(),
        product_id: "premium_monthly".to_string(),
        price_string: "$2.99/month".to_string(),
    }
}

/// Spawn a one-shot canned API server.
///
/// Serves the given responses to consecutive requests, then exits. The
/// returned handle resolves to the raw request heads, for asserting on
/// method, path, and headers.
#[allow(dead_code)]
pub async fn spawn_api(
    responses: Vec<(u16, String)>,
) -> (String, tokio::task::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.expect("accept");
            requests.push(read_request(&mut socket).await);

            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
        }
        requests
    });

    (format!("http://{}/api", addr), handle)
}

/// Read one full HTTP request (headers plus content-length body).
#[allow(dead_code)]
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.expect("read request");
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);

        let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&data[..end]).to_lowercase();
        let content_length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if data.len() >= end + 4 + content_length {
            break;
        }
    }
    String::from_utf8_lossy(&data).to_string()
}
