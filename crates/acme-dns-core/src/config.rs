//! Solver configuration
//!
//! The configuration is the JSON object attached to an issuer. Fields left
//! out or set to zero fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default TTL for challenge records (seconds)
pub const DEFAULT_TTL: u32 = 120;

/// Default deadline for one Present or CleanUp call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest deadline a configuration may request
pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);

/// Per-issuer solver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    /// Name of the secret holding the API credentials
    pub credentials_secret_name: String,

    /// Namespace of the credentials secret.
    ///
    /// Empty means the namespace of the resource that raised the challenge.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub credentials_secret_namespace: String,

    /// API base URL (empty = provider default)
    pub base_url: String,

    /// Token endpoint URL (empty = provider default)
    pub auth_url: String,

    /// Record TTL in seconds (≤ 0 = [`DEFAULT_TTL`])
    pub ttl: i64,

    /// Operation deadline in seconds (≤ 0 = [`DEFAULT_TIMEOUT`])
    pub timeout_seconds: i64,
}

impl SolverConfig {
    /// Create a configuration referencing a credentials secret
    pub fn new(credentials_secret_name: impl Into<String>) -> Self {
        Self {
            credentials_secret_name: credentials_secret_name.into(),
            ..Self::default()
        }
    }

    /// Parse and validate the raw issuer configuration
    pub fn from_json(raw: Option<&serde_json::Value>) -> Result<Self> {
        let raw = raw.ok_or_else(|| Error::config("config is required"))?;

        let config: SolverConfig = serde_json::from_value(raw.clone())
            .map_err(|e| Error::config(format!("failed to unmarshal config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.credentials_secret_name.is_empty() {
            return Err(Error::config("credentialsSecretName is required"));
        }
        Ok(())
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the token endpoint URL
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Set the credentials secret namespace
    pub fn with_secret_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.credentials_secret_namespace = namespace.into();
        self
    }

    /// Effective record TTL
    pub fn ttl(&self) -> u32 {
        if self.ttl <= 0 {
            DEFAULT_TTL
        } else {
            u32::try_from(self.ttl).unwrap_or(u32::MAX)
        }
    }

    /// Effective operation deadline, capped at [`MAX_TIMEOUT`]
    pub fn timeout(&self) -> Duration {
        if self.timeout_seconds <= 0 {
            DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(self.timeout_seconds.unsigned_abs()).min(MAX_TIMEOUT)
        }
    }

    /// Configured base URL, if any
    pub fn base_url(&self) -> Option<&str> {
        Some(self.base_url.as_str()).filter(|s| !s.is_empty())
    }

    /// Configured token endpoint URL, if any
    pub fn auth_url(&self) -> Option<&str> {
        Some(self.auth_url.as_str()).filter(|s| !s.is_empty())
    }

    /// Namespace to read credentials from
    ///
    /// The configured namespace wins over the challenge's resource namespace.
    pub fn secret_namespace<'a>(&'a self, resource_namespace: &'a str) -> Result<&'a str> {
        if !self.credentials_secret_namespace.is_empty() {
            return Ok(&self.credentials_secret_namespace);
        }
        if !resource_namespace.is_empty() {
            return Ok(resource_namespace);
        }
        Err(Error::config(
            "credentialsSecretNamespace is required when challenge resource namespace is empty",
        ))
    }
}
