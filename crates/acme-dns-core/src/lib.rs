// # acme-dns-core
//
// Core library for reconciling ACME DNS-01 challenge records against a DNS
// provider's record-management API.
//
// ## Architecture Overview
//
// - **names**: Pure zone / relative record name resolution
// - **RecordApi**: Trait for create/list/delete calls against a provider
// - **CredentialSource**: Trait for looking up API credentials
// - **Reconciler**: Present (create the TXT record) and CleanUp (delete
//   matching TXT records)
// - **Solver**: Per-request config + credentials + client construction
//
// ## Design Principles
//
// 1. **Provider-agnostic core**: Providers live in their own crates
// 2. **No hidden retries**: Every error is returned to the caller as-is
// 3. **Exact matching**: Records are identified by (name, type, data);
//    provider IDs are opaque
// 4. **Library-first**: The webhook server and bootstrap live elsewhere

pub mod config;
pub mod credentials;
pub mod error;
pub mod names;
pub mod reconciler;
pub mod solver;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use config::SolverConfig;
pub use credentials::MemoryCredentialSource;
pub use error::{Error, Operation, RecordTarget, Result};
pub use names::{normalize_zone, relative_record_name};
pub use reconciler::{Reconciler, is_challenge_record};
pub use solver::Solver;
pub use traits::{CredentialSource, RecordApi, RecordApiFactory};
pub use types::{ChallengeContext, ChallengeRequest, Credentials, DesiredRecord, DnsRecord};
