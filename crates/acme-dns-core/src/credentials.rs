// # Memory Credential Source
//
// In-memory implementation of CredentialSource.
//
// ## Purpose
//
// Holds raw secret data keyed by (namespace, name). Useful for tests,
// embedding with static credentials, or feeding credentials fetched by an
// outer layer into the solver.
//
// Secret data is validated on every lookup, exactly as it would be when
// read from an external store: values are trimmed and all four keys must
// be non-empty.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::traits::CredentialSource;
use crate::types::Credentials;
use crate::{Error, Result};

type SecretData = HashMap<String, String>;

/// In-memory credential source
///
/// # Example
///
/// ```rust,no_run
/// use acme_dns_core::MemoryCredentialSource;
/// use acme_dns_core::traits::CredentialSource;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = MemoryCredentialSource::new();
///     source
///         .insert_credentials("cert-manager", "contabo-credentials", "id", "secret", "user", "pass")
///         .await;
///
///     let creds = source.credentials("cert-manager", "contabo-credentials").await?;
///     assert_eq!(creds.username(), "user");
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Default)]
pub struct MemoryCredentialSource {
    inner: Arc<RwLock<HashMap<(String, String), SecretData>>>,
}

impl std::fmt::Debug for MemoryCredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCredentialSource")
            .field("secrets", &"<REDACTED>")
            .finish()
    }
}

impl MemoryCredentialSource {
    /// Create a new empty credential source
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw secret data under `namespace/name`, replacing any previous entry
    pub async fn insert_secret(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        data: HashMap<String, String>,
    ) {
        let mut guard = self.inner.write().await;
        guard.insert((namespace.into(), name.into()), data);
    }

    /// Store the four credential fields under `namespace/name`
    pub async fn insert_credentials(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        client_id: &str,
        client_secret: &str,
        username: &str,
        password: &str,
    ) {
        let data = [
            (crate::types::SECRET_KEY_CLIENT_ID, client_id),
            (crate::types::SECRET_KEY_CLIENT_SECRET, client_secret),
            (crate::types::SECRET_KEY_USERNAME, username),
            (crate::types::SECRET_KEY_PASSWORD, password),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        self.insert_secret(namespace, name, data).await;
    }

    /// Remove the secret stored under `namespace/name`
    pub async fn remove(&self, namespace: &str, name: &str) {
        let mut guard = self.inner.write().await;
        guard.remove(&(namespace.to_string(), name.to_string()));
    }

    /// Number of stored secrets
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the source is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialSource for MemoryCredentialSource {
    async fn credentials(&self, namespace: &str, name: &str) -> Result<Credentials> {
        let secret_ref = format!("{}/{}", namespace, name);

        let guard = self.inner.read().await;
        let data = guard
            .get(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| {
                Error::config(format!(
                    "failed to get credentials secret {}: not found",
                    secret_ref
                ))
            })?;

        Credentials::from_secret_data(&secret_ref, data)
    }
}
