//! Access token cache
//!
//! Contabo uses an OAuth2 password grant. A token is fetched on first use
//! and reused until it is within [`EXPIRY_MARGIN`] of expiring.
//!
//! The cache lock is held across check-then-refresh, so concurrent callers
//! either reuse a valid token or wait on the one refresh in flight. A failed
//! refresh leaves the cached state as it was.

use std::time::Duration;

use acme_dns_core::{Credentials, Error, Result};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::types::{ApiErrorResponse, TokenResponse};

/// A token is only used if it stays valid at least this long
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Longest lifetime accepted from the token endpoint
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Token lifetime from an `expires_in` value, capped at [`MAX_TOKEN_LIFETIME`]
fn lifetime_from(expires_in: i64) -> Duration {
    Duration::from_secs(expires_in.max(0).unsigned_abs()).min(MAX_TOKEN_LIFETIME)
}

/// A cached bearer token
#[derive(Clone)]
pub(crate) struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_usable(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Fetches and caches bearer tokens for one set of credentials
pub struct TokenCache {
    auth_url: String,
    credentials: Credentials,
    cached: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("auth_url", &self.auth_url)
            .field("credentials", &self.credentials)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl TokenCache {
    /// Create an empty cache
    pub fn new(auth_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            auth_url: auth_url.into(),
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// Token endpoint URL
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Return a usable token, refreshing it if needed
    pub async fn current_token(&self, http: &reqwest::Client) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_usable(Instant::now()) {
                debug!("Reusing cached access token");
                return Ok(token.value.clone());
            }
            debug!("Cached access token is expiring, refreshing");
        }

        let fresh = self.fetch(http).await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    /// Drop the cached token
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn fetch(&self, http: &reqwest::Client) -> Result<AccessToken> {
        let request_id = Uuid::new_v4().to_string();
        trace!(request_id = %request_id, "Requesting access token");

        let form = [
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret()),
            ("username", self.credentials.username()),
            ("password", self.credentials.password()),
            ("grant_type", "password"),
        ];

        let requested_at = Instant::now();
        let response = http
            .post(&self.auth_url)
            .header("x-request-id", &request_id)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::auth(format!("token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::auth(format!("failed to read token response: {}", e)))?;

        if !status.is_success() {
            let detail = ApiErrorResponse::message_from(&body).unwrap_or_else(|| status.to_string());
            return Err(Error::auth(format!("token endpoint returned {}: {}", status.as_u16(), detail)));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::auth(format!("failed to decode token response: {}", e)))?;

        if parsed.access_token.is_empty() {
            return Err(Error::auth("token response did not include an access token"));
        }

        let lifetime = lifetime_from(parsed.expires_in);
        debug!("Obtained access token valid for {}s", lifetime.as_secs());

        Ok(AccessToken {
            value: parsed.access_token,
            expires_at: requested_at + lifetime,
        })
    }
}
