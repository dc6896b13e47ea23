// # Record API Trait
//
// Defines the interface the reconciler uses to manage records through a
// DNS provider's API.
//
// ## Implementations
//
// - Contabo: `acme-dns-provider-contabo` crate
//
// ## Usage
//
// ```rust,ignore
// use acme_dns_core::{DesiredRecord, RecordApi};
//
// async fn example(api: &dyn RecordApi) -> acme_dns_core::Result<()> {
//     let record = DesiredRecord::txt("_acme-challenge", "proof", 120);
//     api.create_record("example.com", &record).await?;
//
//     for found in api.list_records("example.com", Some("_acme-challenge")).await? {
//         api.delete_record("example.com", &found.record_id).await?;
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::SolverConfig;
use crate::types::{Credentials, DesiredRecord, DnsRecord};

/// Trait for DNS record API clients
///
/// Each call is a single request against the provider (plus a token
/// request when the client's token needs refreshing).
///
/// # Thread Safety
///
/// Implementations must be usable from concurrent tasks. Any shared state,
/// such as a cached bearer token, lives inside the client behind a lock.
///
/// # No Retries
///
/// Implementations must not retry or back off. A failed call is reported
/// to the caller unmodified; retry policy, if any, belongs in a separate
/// wrapper.
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// Create a record in `zone`
    ///
    /// No duplicate detection: a conflict reported by the provider
    /// surfaces as [`Error::Api`](crate::Error::Api).
    async fn create_record(&self, zone: &str, record: &DesiredRecord) -> crate::Result<()>;

    /// List records in `zone`
    ///
    /// `search` narrows the result server-side. The provider's matching
    /// may be looser than exact, so callers must filter the result
    /// themselves.
    async fn list_records(&self, zone: &str, search: Option<&str>)
    -> crate::Result<Vec<DnsRecord>>;

    /// Delete the record with the given provider ID
    async fn delete_record(&self, zone: &str, record_id: &str) -> crate::Result<()>;

    /// Get the provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing record API clients from configuration
pub trait RecordApiFactory: Send + Sync {
    /// Create a client for one solver configuration and credential set
    fn create(
        &self,
        config: &SolverConfig,
        credentials: Credentials,
    ) -> crate::Result<Arc<dyn RecordApi>>;

    /// Name of the provider this factory builds clients for
    fn provider_name(&self) -> &'static str;
}
