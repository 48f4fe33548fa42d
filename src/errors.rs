//! Push Client Error Hierarchy
//!
//! Defines the error types for the push registration and dispatch pipeline,
//! categorized by lifecycle phase and operational concerns.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error produced by an external collaborator (platform SDK,
/// remote subscription service, application delegate).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Permission / token acquisition failures
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Remote topic subscription failures
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// Aggregate delegate fan-out failures (non-fatal)
    #[error(transparent)]
    Delegate(#[from] DelegateInvocationError),

    /// Persistence layer failures
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unrecoverable failures
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The user declined the permission prompt
    #[error("Push permission denied")]
    PermissionDenied,

    /// Push is disabled or unsupported on this device
    #[error("Push permission unavailable: {0}")]
    PermissionUnavailable(String),

    /// The native token fetch failed (SDK or network failure)
    #[error("Registration token fetch failed: {source}")]
    TokenFetch {
        #[source]
        source: BoxError,
    },

    /// The caller cancelled the registration attempt
    #[error("Registration attempt cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    /// The remote subscription service rejected a tag operation
    #[error("Remote subscription call failed for tag '{tag}': {source}")]
    Remote {
        tag: String,
        #[source]
        source: BoxError,
    },
}

/// One delegate's failure inside a fan-out pass.
#[derive(Debug)]
pub struct DelegateFailure {
    pub delegate: String,
    pub source: BoxError,
}

/// Aggregate of every delegate failure from a single fan-out pass.
///
/// Every registered delegate was invoked before this error was built;
/// it reports, it never short-circuits.
#[derive(Debug)]
pub struct DelegateInvocationError {
    pub failures: Vec<DelegateFailure>,
}

impl std::error::Error for DelegateInvocationError {}

impl std::fmt::Display for DelegateInvocationError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{} delegate(s) failed:", self.failures.len())?;
        for failure in &self.failures {
            write!(f, " [{}: {}]", failure.delegate, failure.source)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Key-value backend failure
    #[error("Storage backend failure: {source}")]
    Backend {
        #[source]
        source: BoxError,
    },

    /// Value codec failure
    #[error("Failed to encode/decode stored value: {0}")]
    Codec(#[from] bincode::Error),
}

impl StoreError {
    pub fn backend(source: impl Into<BoxError>) -> Self {
        StoreError::Backend {
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegate_invocation_error_names_every_failure() {
        let err = DelegateInvocationError {
            failures: vec![
                DelegateFailure {
                    delegate: "analytics".to_string(),
                    source: "boom".into(),
                },
                DelegateFailure {
                    delegate: "badge".to_string(),
                    source: "bang".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 delegate(s) failed"));
        assert!(msg.contains("analytics"));
        assert!(msg.contains("badge"));
    }
}
