//! Error types for the ACME DNS-01 reconciler
//!
//! Every failure is returned to the caller as-is. Nothing in this crate or
//! the provider crates retries.

use std::fmt;
use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stage of a Present or CleanUp call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Credential lookup through a credential source
    Credentials,
    /// Token request against the auth endpoint
    Authenticate,
    /// Create a record
    Create,
    /// List records in a zone
    List,
    /// Delete a record by ID
    Delete,
}

impl Operation {
    /// Short lowercase name used in messages and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Credentials => "credentials lookup",
            Operation::Authenticate => "authenticate",
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zone and record a failed call was acting on
///
/// Empty until the reconciler attaches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTarget {
    /// Normalized zone
    pub zone: String,
    /// Zone-relative record name
    pub record_name: String,
}

impl RecordTarget {
    /// Check if no target has been attached
    pub fn is_empty(&self) -> bool {
        self.zone.is_empty() && self.record_name.is_empty()
    }
}

impl fmt::Display for RecordTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, " of {} in zone {}", self.record_name, self.zone)
    }
}

/// Core error type for the reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration or credentials are missing or invalid.
    ///
    /// Raised before any network call is made.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The token endpoint could not be reached, rejected the request,
    /// or returned an unusable body
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A record endpoint returned a non-success status
    #[error("DNS API error during {operation}{target} ({status}): {message}")]
    Api {
        /// Operation that failed
        operation: Operation,
        /// HTTP status code
        status: u16,
        /// Provider message, or the status line when the body had none
        message: String,
        /// Zone and record being reconciled
        target: RecordTarget,
    },

    /// Connection-level failure or deadline exceeded
    #[error("Transport error during {operation}{target}: {message}")]
    Transport {
        /// Operation that failed
        operation: Operation,
        /// Underlying failure description
        message: String,
        /// Whether the failure was a timeout
        timed_out: bool,
        /// Zone and record being reconciled
        target: RecordTarget,
    },

    /// A success response body could not be decoded
    #[error("Failed to decode {operation} response{target}: {message}")]
    Decode {
        /// Operation whose response was malformed
        operation: Operation,
        /// Decoder message
        message: String,
        /// Zone and record being reconciled
        target: RecordTarget,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create an API error
    pub fn api(operation: Operation, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            operation,
            status,
            message: message.into(),
            target: RecordTarget::default(),
        }
    }

    /// Create a transport error (not a timeout)
    pub fn transport(operation: Operation, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
            timed_out: false,
            target: RecordTarget::default(),
        }
    }

    /// Create a transport error for an exceeded deadline
    pub fn timeout(operation: Operation, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
            timed_out: true,
            target: RecordTarget::default(),
        }
    }

    /// Create a decode error
    pub fn decode(operation: Operation, message: impl Into<String>) -> Self {
        Self::Decode {
            operation,
            message: message.into(),
            target: RecordTarget::default(),
        }
    }

    /// True if this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }

    /// Attach the zone and record name to a record-call error
    ///
    /// Config and Auth errors are returned unchanged. An already attached
    /// target is kept.
    pub fn with_target(mut self, zone: &str, record_name: &str) -> Self {
        if let Self::Api { target, .. } | Self::Transport { target, .. } | Self::Decode { target, .. } =
            &mut self
        {
            if target.is_empty() {
                *target = RecordTarget {
                    zone: zone.to_string(),
                    record_name: record_name.to_string(),
                };
            }
        }
        self
    }

    /// Zone and record attached to this error, if any
    pub fn target(&self) -> Option<&RecordTarget> {
        match self {
            Self::Api { target, .. } | Self::Transport { target, .. } | Self::Decode { target, .. }
                if !target.is_empty() =>
            {
                Some(target)
            }
            _ => None,
        }
    }

    /// The record API operation this error came from, if any
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Config(_) => None,
            Self::Auth(_) => Some(Operation::Authenticate),
            Self::Api { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
        }
    }
}
