// Shared test helpers for building a background service against mock servers.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::sync::Arc;

use ipscope::background::Background;
use ipscope::config::{Config, EgressEndpoints};
use ipscope::initialization::Stores;
use ipscope::store::{write_token, MemoryStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Paths the mock server answers the four egress endpoints on.
#[allow(dead_code)] // Used by other test files
pub const EGRESS_PATHS: [&str; 4] = ["/dom4", "/dom6", "/glob4", "/glob6"];

/// Configuration pointing every remote endpoint at `server`.
pub fn test_config(server: &MockServer) -> Config {
    let uri = server.uri();
    Config {
        detail_api_base: uri.clone(),
        asset_dir: "/nonexistent-assets".into(),
        endpoints: EgressEndpoints {
            domestic_v4: format!("{}{}", uri, EGRESS_PATHS[0]),
            domestic_v6: format!("{}{}", uri, EGRESS_PATHS[1]),
            global_v4: format!("{}{}", uri, EGRESS_PATHS[2]),
            global_v6: format!("{}{}", uri, EGRESS_PATHS[3]),
        },
        ..Default::default()
    }
}

/// Background service with in-memory stores and an optional token.
#[allow(dead_code)] // Used by other test files
pub fn background_with(server: &MockServer, token: Option<&str>) -> Background {
    let durable = Arc::new(MemoryStore::new());
    if let Some(token) = token {
        write_token(durable.as_ref(), token).expect("Failed to store token");
    }
    let stores = Stores {
        session: Arc::new(MemoryStore::new()),
        durable,
    };
    Background::new(
        &test_config(server),
        stores,
        Arc::new(reqwest::Client::new()),
    )
}

/// Mounts a plaintext egress answer on `route`.
#[allow(dead_code)] // Used by other test files
pub async fn mount_egress(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a detail record for `ip`, expected to be fetched `times` times.
#[allow(dead_code)] // Used by other test files
pub async fn mount_details(server: &MockServer, ip: &str, body: serde_json::Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", ip)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}
