// # Contabo DNS Provider
//
// This crate implements the `RecordApi` trait for the Contabo DNS API and a
// factory the `Solver` uses to build one client per challenge request.
//
// ## Behavior
//
// - One HTTP request per record operation, plus a token request when the
//   cached token is missing or about to expire
// - Errors are returned to the caller unchanged; nothing is retried
// - HTTP timeout defaults to 15 seconds
// - Record IDs are passed through as opaque strings
//
// ## Security Requirements
//
// - Credentials and tokens NEVER appear in logs or Debug output
// - All four credential fields are required before any request is made
//
// ## API Reference
//
// - Token: POST `https://auth.contabo.com/auth/realms/contabo/protocol/openid-connect/token`
// - Records: `https://api.contabo.com/v1/dns/zones/{zone}/records`

mod client;
mod token;
mod types;

use std::sync::Arc;

use acme_dns_core::traits::{RecordApi, RecordApiFactory};
use acme_dns_core::{Credentials, Result, SolverConfig};

pub use client::{ContaboClient, DEFAULT_AUTH_URL, DEFAULT_BASE_URL, DEFAULT_HTTP_TIMEOUT};
pub use token::{EXPIRY_MARGIN, MAX_TOKEN_LIFETIME, TokenCache};

/// Factory for creating Contabo clients from solver configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct ContaboFactory;

impl RecordApiFactory for ContaboFactory {
    fn create(
        &self,
        config: &SolverConfig,
        credentials: Credentials,
    ) -> Result<Arc<dyn RecordApi>> {
        let client = ContaboClient::new(
            credentials,
            config.base_url(),
            config.auth_url(),
            config.timeout(),
        )?;

        tracing::debug!(
            "Created Contabo client for {} (auth: {})",
            client.base_url(),
            client.auth_url()
        );

        Ok(Arc::new(client))
    }

    fn provider_name(&self) -> &'static str {
        "contabo"
    }
}
