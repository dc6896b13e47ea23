//! Data model shared by the reconciler and provider implementations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Record type managed by the reconciler
pub const TXT_RECORD_TYPE: &str = "TXT";

/// Secret data key holding the OAuth client ID
pub const SECRET_KEY_CLIENT_ID: &str = "clientId";
/// Secret data key holding the OAuth client secret
pub const SECRET_KEY_CLIENT_SECRET: &str = "clientSecret";
/// Secret data key holding the API username
pub const SECRET_KEY_USERNAME: &str = "username";
/// Secret data key holding the API password
pub const SECRET_KEY_PASSWORD: &str = "password";

/// API credentials for one reconciliation call
///
/// All four fields are non-empty. The Debug implementation does not expose
/// the client secret or the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<REDACTED>")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl Credentials {
    /// Create credentials, failing fast if any field is empty
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
        };

        if credentials.client_id.is_empty()
            || credentials.client_secret.is_empty()
            || credentials.username.is_empty()
            || credentials.password.is_empty()
        {
            return Err(Error::config(
                "clientID, clientSecret, username, and password are required",
            ));
        }

        Ok(credentials)
    }

    /// Build credentials from raw secret data
    ///
    /// Values are trimmed. `secret_ref` names the secret in the error
    /// message (e.g. "namespace/name").
    pub fn from_secret_data(secret_ref: &str, data: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| data.get(key).map(|v| v.trim()).unwrap_or_default();

        let client_id = get(SECRET_KEY_CLIENT_ID);
        let client_secret = get(SECRET_KEY_CLIENT_SECRET);
        let username = get(SECRET_KEY_USERNAME);
        let password = get(SECRET_KEY_PASSWORD);

        if client_id.is_empty() || client_secret.is_empty() || username.is_empty() || password.is_empty() {
            return Err(Error::config(format!(
                "secret {} must contain non-empty {:?}, {:?}, {:?}, and {:?} keys",
                secret_ref,
                SECRET_KEY_CLIENT_ID,
                SECRET_KEY_CLIENT_SECRET,
                SECRET_KEY_USERNAME,
                SECRET_KEY_PASSWORD,
            )));
        }

        Self::new(client_id, client_secret, username, password)
    }

    /// OAuth client ID
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// OAuth client secret
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// API username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// API password
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// A DNS record as reported by the provider
///
/// Identity for matching is (name, type, data). `record_id` is assigned by
/// the provider and treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier
    pub record_id: String,
    /// Name relative to the zone
    pub name: String,
    /// Record type as reported by the provider
    pub record_type: String,
    /// Record data (the proof value for challenge records)
    pub data: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Priority (unused for TXT)
    pub priority: u32,
}

/// The record that should exist while a challenge is being validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRecord {
    /// Name relative to the zone
    pub name: String,
    /// Always [`TXT_RECORD_TYPE`]
    pub record_type: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Always 0
    pub priority: u32,
    /// Proof value
    pub data: String,
}

impl DesiredRecord {
    /// Desired TXT record for a challenge
    pub fn txt(name: impl Into<String>, data: impl Into<String>, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: TXT_RECORD_TYPE.to_string(),
            ttl,
            priority: 0,
            data: data.into(),
        }
    }
}

/// Read-only input to one Present or CleanUp call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeContext {
    /// Zone the record lives in (trailing dot allowed)
    pub zone: String,
    /// Fully-qualified record name (trailing dot allowed)
    pub fqdn: String,
    /// Expected TXT value. May be empty for CleanUp.
    pub proof_value: String,
}

impl ChallengeContext {
    /// Create a new challenge context
    pub fn new(
        zone: impl Into<String>,
        fqdn: impl Into<String>,
        proof_value: impl Into<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            fqdn: fqdn.into(),
            proof_value: proof_value.into(),
        }
    }
}

/// A challenge as delivered to the solver
///
/// Carries the challenge itself plus what the solver needs to locate
/// configuration and credentials.
#[derive(Debug, Clone)]
pub struct ChallengeRequest {
    /// The challenge to reconcile
    pub challenge: ChallengeContext,
    /// Namespace of the resource that requested the certificate
    pub resource_namespace: String,
    /// Raw solver configuration attached to the issuer
    pub config: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_credentials_require_all_fields() {
        assert!(Credentials::new("id", "secret", "user", "pass").is_ok());
        assert!(matches!(
            Credentials::new("id", "", "user", "pass"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_credentials_from_secret_trims_values() {
        let data = secret(&[
            (SECRET_KEY_CLIENT_ID, " id\n"),
            (SECRET_KEY_CLIENT_SECRET, "secret"),
            (SECRET_KEY_USERNAME, "user "),
            (SECRET_KEY_PASSWORD, "pass"),
        ]);

        let creds = Credentials::from_secret_data("ns/creds", &data).unwrap();
        assert_eq!(creds.client_id(), "id");
        assert_eq!(creds.username(), "user");
    }

    #[test]
    fn test_credentials_from_incomplete_secret() {
        let data = secret(&[(SECRET_KEY_CLIENT_ID, "id")]);

        let err = Credentials::from_secret_data("ns/creds", &data).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("ns/creds"));
        assert!(err.to_string().contains("clientSecret"));
    }

    #[test]
    fn test_credentials_whitespace_only_rejected() {
        let data = secret(&[
            (SECRET_KEY_CLIENT_ID, "id"),
            (SECRET_KEY_CLIENT_SECRET, "   "),
            (SECRET_KEY_USERNAME, "user"),
            (SECRET_KEY_PASSWORD, "pass"),
        ]);

        assert!(Credentials::from_secret_data("ns/creds", &data).is_err());
    }

    #[test]
    fn test_credentials_not_exposed_in_debug() {
        let creds = Credentials::new("id", "very-secret", "user", "hunter2").unwrap();

        let debug_str = format!("{:?}", creds);
        assert!(!debug_str.contains("very-secret"));
        assert!(!debug_str.contains("hunter2"));
        assert!(debug_str.contains("Credentials"));
    }

    #[test]
    fn test_desired_txt_record() {
        let record = DesiredRecord::txt("_acme-challenge", "key", 120);
        assert_eq!(record.record_type, "TXT");
        assert_eq!(record.priority, 0);
        assert_eq!(record.ttl, 120);
    }
}
