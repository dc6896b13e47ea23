//! Contabo DNS API client
//!
//! ## API Reference
//!
//! - Create: POST `/v1/dns/zones/{zone}/records`
//! - List: GET `/v1/dns/zones/{zone}/records?search={name}`
//! - Delete: DELETE `/v1/dns/zones/{zone}/records/{recordId}`
//!
//! Every request carries a bearer token from the [`TokenCache`] and a fresh
//! `x-request-id`.

use std::time::Duration;

use acme_dns_core::traits::RecordApi;
use acme_dns_core::{Credentials, DesiredRecord, DnsRecord, Error, Operation, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::token::TokenCache;
use crate::types::{ApiErrorResponse, CreateRecordRequest, ListRecordsResponse};

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.contabo.com";

/// Production token endpoint
pub const DEFAULT_AUTH_URL: &str =
    "https://auth.contabo.com/auth/realms/contabo/protocol/openid-connect/token";

/// Default HTTP timeout for API requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Contabo DNS API client
///
/// Holds the credentials and the token cache for its lifetime. The Debug
/// implementation does not expose either.
pub struct ContaboClient {
    /// API base URL without trailing slash
    base_url: String,

    /// Token endpoint and cached token
    tokens: TokenCache,

    /// HTTP client for API and token requests
    http: reqwest::Client,
}

impl std::fmt::Debug for ContaboClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContaboClient")
            .field("base_url", &self.base_url)
            .field("auth_url", &self.tokens.auth_url())
            .field("credentials", &"<REDACTED>")
            .finish()
    }
}

impl ContaboClient {
    /// Create a client
    ///
    /// # Parameters
    ///
    /// - `credentials`: OAuth client and API user credentials
    /// - `base_url`: API base URL; `None` or empty uses [`DEFAULT_BASE_URL`]
    /// - `auth_url`: token endpoint; `None` or empty uses [`DEFAULT_AUTH_URL`]
    /// - `timeout`: per-request HTTP timeout; zero uses [`DEFAULT_HTTP_TIMEOUT`]
    pub fn new(
        credentials: Credentials,
        base_url: Option<&str>,
        auth_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let auth_url = auth_url.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_AUTH_URL);
        let timeout = if timeout.is_zero() {
            DEFAULT_HTTP_TIMEOUT
        } else {
            timeout
        };

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            tokens: TokenCache::new(auth_url, credentials),
            http,
        })
    }

    /// Create a client against the production endpoints
    pub fn with_defaults(credentials: Credentials) -> Result<Self> {
        Self::new(credentials, None, None, DEFAULT_HTTP_TIMEOUT)
    }

    /// API base URL in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token endpoint in use
    pub fn auth_url(&self) -> &str {
        self.tokens.auth_url()
    }

    /// Drop the cached token so the next call authenticates again
    pub async fn invalidate_token(&self) {
        self.tokens.invalidate().await;
    }

    fn records_url(&self, zone: &str) -> String {
        format!(
            "{}/v1/dns/zones/{}/records",
            self.base_url,
            urlencoding::encode(zone)
        )
    }

    /// Build an authenticated request
    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self.tokens.current_token(&self.http).await?;
        let request_id = Uuid::new_v4().to_string();
        trace!(request_id = %request_id, "{} {}", method, url);

        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .header("x-request-id", request_id))
    }

    /// Send a request, mapping transport failures and non-success statuses
    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(operation, e))?;
        let message = ApiErrorResponse::message_from(&body).unwrap_or_else(|| status.to_string());

        Err(Error::api(operation, status.as_u16(), message))
    }
}

fn transport_error(operation: Operation, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout(operation, err.to_string())
    } else {
        Error::transport(operation, err.to_string())
    }
}

#[async_trait]
impl RecordApi for ContaboClient {
    async fn create_record(&self, zone: &str, record: &DesiredRecord) -> Result<()> {
        let url = self.records_url(zone);
        let request = self
            .request(Method::POST, &url)
            .await?
            .json(&CreateRecordRequest::from(record));

        self.send(Operation::Create, request).await?;

        info!(
            "Created {} record {} in zone {}",
            record.record_type, record.name, zone
        );
        Ok(())
    }

    async fn list_records(&self, zone: &str, search: Option<&str>) -> Result<Vec<DnsRecord>> {
        let url = self.records_url(zone);
        let mut request = self.request(Method::GET, &url).await?;
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            request = request.query(&[("search", search)]);
        }

        let response = self.send(Operation::List, request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(Operation::List, e))?;
        let parsed: ListRecordsResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::decode(Operation::List, e.to_string()))?;

        debug!("Listed {} records in zone {}", parsed.data.len(), zone);
        Ok(parsed.data.into_iter().map(DnsRecord::from).collect())
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        let url = format!(
            "{}/{}",
            self.records_url(zone),
            urlencoding::encode(record_id)
        );
        let request = self.request(Method::DELETE, &url).await?;

        self.send(Operation::Delete, request).await?;

        info!("Deleted record {} in zone {}", record_id, zone);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "contabo"
    }
}
