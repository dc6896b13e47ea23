//! Core traits for the reconciler
//!
//! - [`RecordApi`]: Create, list and delete records via a provider API
//! - [`RecordApiFactory`]: Build a [`RecordApi`] from configuration
//! - [`CredentialSource`]: Look up API credentials

pub mod credential_source;
pub mod record_api;

pub use credential_source::CredentialSource;
pub use record_api::{RecordApi, RecordApiFactory};
