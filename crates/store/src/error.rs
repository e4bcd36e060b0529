//! Error taxonomy for store operations
//!
//! Only [`StoreError::Throttled`] is transient; the retry loop in
//! [`crate::Fetcher`] absorbs it up to the attempt ceiling and everything
//! else propagates immediately. A secret value that fails to decode as JSON
//! is not an error anywhere: it falls back to the raw string.

use thiserror::Error;

/// Error types for secret store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rate-limited the request. Recoverable by retrying.
    #[error("Secret store throttled request for '{secret_id}'")]
    Throttled {
        /// Secret id that was being fetched
        secret_id: String,
    },

    /// The fetch was still throttled when the attempt ceiling was reached.
    #[error("Fetch of '{secret_id}' still throttled after {attempts} attempts")]
    RetryExhausted {
        /// Secret id that was being fetched
        secret_id: String,
        /// Total attempts made, including the first
        attempts: u32,
    },

    /// The secret does not exist in the store.
    #[error("Secret '{secret_id}' not found")]
    NotFound {
        /// Secret id that was requested
        secret_id: String,
    },

    /// Any other store failure: access denied, malformed request, transport.
    #[error("Secret store {operation} failed: {message}")]
    Store {
        /// Store operation that failed (e.g. `GetSecretValue`)
        operation: String,
        /// Error message from the store
        message: String,
    },

    /// The record carried neither a string value nor UTF-8 binary.
    #[error("Secret '{secret_id}' has no usable string or binary value")]
    MissingValue {
        /// Secret id the record was fetched for
        secret_id: String,
    },

    /// The blocking facade could not run: runtime construction failed or the
    /// caller is already inside an async runtime.
    #[error("Blocking call failed: {message}")]
    Runtime {
        /// What went wrong
        message: String,
    },
}

impl StoreError {
    /// Build a fatal store error for the given operation.
    pub fn store(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Check whether this error is the transient rate-limit signal.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }
}
