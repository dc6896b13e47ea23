// # Credential Source Trait
//
// Defines the lookup the solver uses to obtain API credentials.
//
// The backing store (a cluster secret, a vault, static configuration) is
// outside this crate. The only contract is: given a namespace and a name,
// return four non-empty strings or fail.

use async_trait::async_trait;

use crate::types::Credentials;

/// Trait for credential lookup implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// Credentials are returned per call and must not be cached by the caller
/// beyond the operation that requested them.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Look up the credentials stored under `namespace/name`
    ///
    /// # Returns
    ///
    /// - `Ok(Credentials)`: All four fields present and non-empty
    /// - `Err(Error::Config)`: The secret is missing or incomplete
    async fn credentials(&self, namespace: &str, name: &str) -> crate::Result<Credentials>;
}
