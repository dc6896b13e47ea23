//! Challenge solver
//!
//! Entry point for challenge requests routed in from a webhook server.
//! Each call:
//!
//! 1. Parses the issuer's solver configuration
//! 2. Resolves which namespace holds the credentials secret
//! 3. Looks up credentials through the [`CredentialSource`]
//! 4. Builds a fresh [`RecordApi`] client through the [`RecordApiFactory`]
//! 5. Runs Present or CleanUp through a [`Reconciler`]
//!
//! The client, and the credentials it holds, are dropped when the call
//! returns.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::debug;

use crate::config::SolverConfig;
use crate::error::{Operation, Result};
use crate::reconciler::{Reconciler, deadline_after, within};
use crate::traits::{CredentialSource, RecordApi, RecordApiFactory};
use crate::types::ChallengeRequest;

/// Solves DNS-01 challenges for one provider
#[derive(Clone)]
pub struct Solver {
    credentials: Arc<dyn CredentialSource>,
    factory: Arc<dyn RecordApiFactory>,
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("provider", &self.factory.provider_name())
            .finish()
    }
}

impl Solver {
    /// Create a solver from a credential source and a client factory
    pub fn new(credentials: Arc<dyn CredentialSource>, factory: Arc<dyn RecordApiFactory>) -> Self {
        Self {
            credentials,
            factory,
        }
    }

    /// Name of the provider this solver manages records with
    pub fn name(&self) -> &'static str {
        self.factory.provider_name()
    }

    /// Create the challenge TXT record
    pub async fn present(&self, request: &ChallengeRequest) -> Result<()> {
        let reconciler = self.reconciler_for(request).await?;
        reconciler.present(&request.challenge).await
    }

    /// Delete the challenge TXT records
    ///
    /// # Returns
    ///
    /// The number of records deleted
    pub async fn clean_up(&self, request: &ChallengeRequest) -> Result<usize> {
        let reconciler = self.reconciler_for(request).await?;
        reconciler.clean_up(&request.challenge).await
    }

    /// Build a reconciler for one request
    ///
    /// The configured timeout covers the credential lookup; the reconciler
    /// gets whatever remains of it.
    async fn reconciler_for(&self, request: &ChallengeRequest) -> Result<Reconciler> {
        let config = SolverConfig::from_json(request.config.as_ref())?;
        let deadline = deadline_after(config.timeout());

        let namespace = config.secret_namespace(&request.resource_namespace)?;
        debug!(
            "Loading credentials from secret {}/{}",
            namespace, config.credentials_secret_name
        );

        let credentials = within(
            deadline,
            Operation::Credentials,
            self.credentials
                .credentials(namespace, &config.credentials_secret_name),
        )
        .await?;

        let api: Arc<dyn RecordApi> = self.factory.create(&config, credentials)?;

        Ok(Reconciler::new(api)
            .with_ttl(config.ttl())
            .with_timeout(deadline.saturating_duration_since(Instant::now())))
    }
}
