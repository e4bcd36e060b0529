//! Fetching with the throttle retry policy
//!
//! Only [`StoreError::Throttled`] is absorbed here; everything else fails
//! fast. The attempt budget lives in a loop local, so every logical fetch
//! starts with a fresh budget no matter how many fetches the same
//! [`Fetcher`] has already served, and concurrent fetches never share one.

use crate::error::StoreError;
use crate::store::{GetSecretRequest, SecretRecord, SecretStore, SecretText};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry behavior for throttled fetches.
///
/// The delay is fixed: throttling recovers on the store's schedule, not
/// ours, so there is nothing for a growing backoff to adapt to here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1050),
        }
    }
}

impl RetryConfig {
    /// Disable retries entirely.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            delay: Duration::ZERO,
        }
    }
}

/// Fetches secret records, absorbing throttle signals up to the configured
/// attempt ceiling.
///
/// Once a retry sequence starts it runs to success or exhaustion; there is
/// no caller-supplied cancellation. The delay is a non-blocking
/// `tokio::time::sleep`, so concurrent operations on the same runtime keep
/// making progress while a fetch waits out a throttle.
#[derive(Debug)]
pub struct Fetcher<S> {
    store: S,
    retry: RetryConfig,
}

impl<S: SecretStore> Fetcher<S> {
    /// Create a fetcher with the default retry policy.
    pub fn new(store: S) -> Self {
        Self::with_retry(store, RetryConfig::default())
    }

    /// Create a fetcher with an explicit retry policy.
    pub fn with_retry(store: S, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    /// The configured retry policy.
    #[must_use]
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Fetch one secret and decode it to text.
    ///
    /// # Errors
    ///
    /// Propagates any non-transient store error, [`StoreError::RetryExhausted`]
    /// once the ceiling is hit, or [`StoreError::MissingValue`] for a record
    /// without a usable value.
    pub async fn fetch(&self, request: &GetSecretRequest) -> Result<SecretText, StoreError> {
        self.fetch_raw(request).await?.into_text()
    }

    /// Fetch one secret and return the full record.
    ///
    /// # Errors
    ///
    /// Propagates any non-transient store error, or
    /// [`StoreError::RetryExhausted`] once the ceiling is hit.
    pub async fn fetch_raw(&self, request: &GetSecretRequest) -> Result<SecretRecord, StoreError> {
        // Attempt budget scoped to this call, not to the instance.
        let mut retries: u32 = 0;
        loop {
            match self.store.get_secret(request).await {
                Ok(record) => {
                    if retries > 0 {
                        debug!(
                            secret_id = %request.secret_id,
                            attempts = retries + 1,
                            "Fetch succeeded after retry"
                        );
                    }
                    return Ok(record);
                }
                Err(StoreError::Throttled { .. }) if retries < self.retry.max_attempts => {
                    retries += 1;
                    warn!(
                        secret_id = %request.secret_id,
                        attempt = retries,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = self.retry.delay.as_millis(),
                        "Secret store throttled fetch, retrying"
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(StoreError::Throttled { .. }) => {
                    return Err(StoreError::RetryExhausted {
                        secret_id: request.secret_id.clone(),
                        attempts: retries + 1,
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }
}
