//! Challenge record reconciler
//!
//! The Reconciler is responsible for:
//! - Resolving the zone and relative record name of a challenge
//! - Creating the challenge TXT record (Present)
//! - Finding and deleting matching challenge records (CleanUp)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ ChallengeContext │
//! └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐       ┌──────────────┐
//! │    Reconciler    │──────▶│ names (pure) │
//! └──────────────────┘       └──────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐       ┌──────────────┐
//! │    RecordApi     │──────▶│ token cache  │──▶ network
//! │ create/list/del  │       │ (in client)  │
//! └──────────────────┘       └──────────────┘
//! ```
//!
//! ## Operation Flow
//!
//! Idle → AuthPending → Authenticated → (Create|List|Delete)Pending →
//! Done | Failed. The first error ends the operation.
//!
//! Every call runs under a deadline. When the deadline passes, the
//! in-flight request future is dropped and a timeout error is returned.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::{DEFAULT_TIMEOUT, DEFAULT_TTL, MAX_TIMEOUT};
use crate::error::{Error, Operation, Result};
use crate::names::{normalize_zone, relative_record_name};
use crate::traits::RecordApi;
use crate::types::{ChallengeContext, DesiredRecord, DnsRecord, TXT_RECORD_TYPE};

/// Reconciles challenge TXT records against a [`RecordApi`]
///
/// Cheap to clone. Clones share the underlying client, and with it the
/// client's cached token.
#[derive(Clone)]
pub struct Reconciler {
    /// Record API client
    api: Arc<dyn RecordApi>,

    /// TTL for created records
    ttl: u32,

    /// Deadline for one Present or CleanUp call
    timeout: Duration,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("provider", &self.api.provider_name())
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Reconciler {
    /// Create a reconciler with the default TTL and timeout
    pub fn new(api: Arc<dyn RecordApi>) -> Self {
        Self {
            api,
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the TTL for created records
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the per-call deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// TTL used for created records
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Deadline applied to each call
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ensure the challenge TXT record exists
    ///
    /// Issues exactly one create. There is no check for an identical
    /// existing record, so presenting the same challenge twice creates two
    /// records unless the provider rejects the duplicate.
    pub async fn present(&self, challenge: &ChallengeContext) -> Result<()> {
        let deadline = deadline_after(self.timeout);
        let zone = normalize_zone(&challenge.zone);
        let name = relative_record_name(&challenge.fqdn, &challenge.zone);

        let span = info_span!(
            "present",
            provider = self.api.provider_name(),
            zone = %zone,
            record_name = %name
        );

        async {
            let record = DesiredRecord::txt(&name, &challenge.proof_value, self.ttl);

            info!("Creating TXT record {} in zone {}", name, zone);
            within(
                deadline,
                Operation::Create,
                self.api.create_record(zone, &record),
            )
            .await
            .map_err(|e| e.with_target(zone, &name))
            .inspect_err(|e| warn!("Present failed: {}", e))?;

            debug!("TXT record {} created", name);
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Delete every challenge TXT record matching the challenge
    ///
    /// Matching records are deleted one at a time. The first failed delete
    /// aborts the call and is returned; records deleted before it stay
    /// deleted. Callers should treat a failure as "state unknown" and run
    /// CleanUp again.
    ///
    /// An empty proof value matches every TXT record with the resolved
    /// name, including ones this system did not create.
    ///
    /// # Returns
    ///
    /// The number of records deleted
    pub async fn clean_up(&self, challenge: &ChallengeContext) -> Result<usize> {
        let deadline = deadline_after(self.timeout);
        let zone = normalize_zone(&challenge.zone);
        let name = relative_record_name(&challenge.fqdn, &challenge.zone);

        let span = info_span!(
            "clean_up",
            provider = self.api.provider_name(),
            zone = %zone,
            record_name = %name
        );

        async {
            if challenge.proof_value.is_empty() {
                warn!(
                    "No proof value supplied; every TXT record named {} will be deleted",
                    name
                );
            }

            let candidates = within(
                deadline,
                Operation::List,
                self.api.list_records(zone, Some(name.as_str())),
            )
            .await
            .map_err(|e| e.with_target(zone, &name))
            .inspect_err(|e| warn!("CleanUp failed to list records: {}", e))?;

            debug!("Found {} candidate records", candidates.len());

            let mut deleted = 0;
            for record in &candidates {
                if !is_challenge_record(record, &name, &challenge.proof_value) {
                    debug!(
                        "Skipping record {} ({} {})",
                        record.record_id, record.record_type, record.name
                    );
                    continue;
                }

                info!(
                    "Deleting TXT record {} ({}) in zone {}",
                    record.name, record.record_id, zone
                );
                within(
                    deadline,
                    Operation::Delete,
                    self.api.delete_record(zone, &record.record_id),
                )
                .await
                .map_err(|e| e.with_target(zone, &name))
                .inspect_err(|e| {
                    warn!(
                        "CleanUp aborted after {} deletions; record {} not deleted: {}",
                        deleted, record.record_id, e
                    )
                })?;
                deleted += 1;
            }

            debug!("Deleted {} TXT records", deleted);
            Ok(deleted)
        }
        .instrument(span)
        .await
    }
}

/// Whether `record` is a challenge record for `name` carrying `value`
///
/// Type comparison ignores case, name comparison is exact. An empty
/// `value` matches any data.
pub fn is_challenge_record(record: &DnsRecord, name: &str, value: &str) -> bool {
    record.record_type.eq_ignore_ascii_case(TXT_RECORD_TYPE)
        && record.name == name
        && (value.is_empty() || record.data == value)
}

/// Deadline `timeout` from now
///
/// A timeout that would overflow the clock is capped at [`MAX_TIMEOUT`].
pub(crate) fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + MAX_TIMEOUT)
}

/// Run `fut` until `deadline`, mapping an elapsed deadline to a timeout error
pub(crate) async fn within<T, F>(deadline: Instant, operation: Operation, fut: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    match tokio::time::timeout_at(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::timeout(operation, "deadline exceeded")),
    }
}
