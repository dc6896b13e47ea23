//! Shared fixtures for Contabo API contract tests
//!
//! One wiremock server stands in for both the token endpoint and the DNS
//! API.

#![allow(dead_code)]

use acme_dns_core::Credentials;
use acme_dns_provider_contabo::ContaboClient;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/auth/token";
pub const ACCESS_TOKEN: &str = "test-access-token";
pub const ZONE_RECORDS_PATH: &str = "/v1/dns/zones/example.com/records";

pub fn credentials() -> Credentials {
    Credentials::new("client-id", "client-secret", "api-user", "api-password").unwrap()
}

pub fn auth_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), TOKEN_PATH)
}

/// Client pointed at `server` for both the API and the token endpoint
pub fn client_for(server: &MockServer) -> ContaboClient {
    client_with_timeout(server, Duration::from_secs(5))
}

pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> ContaboClient {
    ContaboClient::new(
        credentials(),
        Some(&server.uri()),
        Some(&auth_url(server)),
        timeout,
    )
    .unwrap()
}

pub fn token_response(expires_in: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": expires_in,
    }))
}

/// Mount a token endpoint expected to be hit exactly `times` times
pub async fn mount_token(server: &MockServer, expires_in: i64, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response(expires_in))
        .expect(times)
        .mount(server)
        .await;
}

/// Response body for a list call
pub fn records_body(records: &[(i64, &str, &str, &str)]) -> serde_json::Value {
    let data: Vec<_> = records
        .iter()
        .map(|(id, name, record_type, data)| {
            json!({
                "recordId": id,
                "name": name,
                "type": record_type,
                "data": data,
                "ttl": 120,
                "prio": 0,
            })
        })
        .collect();
    json!({ "data": data })
}
