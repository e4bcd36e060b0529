//! Remote secret store client for secretfold
//!
//! Fetches named secrets from a remote store and assembles them into one
//! nested configuration object scoped by namespace/environment prefixes.
//!
//! - [`ConfigLoader`]: the read path — concurrent fetches, prefix
//!   stripping, JSON value decoding, tree folding
//! - [`Fetcher`] and [`RetryConfig`]: fetch-by-id with a fixed-delay retry
//!   policy that absorbs throttle signals up to an attempt ceiling
//! - [`Writer`]: the one-shot write path, composing prefixed names
//! - [`blocking`]: synchronous entry points for callers without a runtime
//!
//! The store itself sits behind the [`SecretStore`] trait; the AWS Secrets
//! Manager implementation is gated behind the `aws` feature.
//!
//! ```ignore
//! use secretfold_store::{AwsSecretStore, ConfigLoader, KeyScheme};
//!
//! let store = AwsSecretStore::new().await;
//! let scheme = KeyScheme::new("/")
//!     .with_namespace("acme")
//!     .with_environment("prod");
//! let loader = ConfigLoader::new(store, scheme);
//!
//! // {"db": {"host": ..., "port": ...}}
//! let config = loader
//!     .load(["acme/prod/db/host", "acme/prod/db/port"])
//!     .await?;
//! ```

pub mod blocking;
mod error;
mod fetch;
mod loader;
mod store;
mod write;

#[cfg(feature = "aws")]
mod aws;

pub use error::StoreError;
pub use fetch::{Fetcher, RetryConfig};
pub use loader::ConfigLoader;
pub use store::{
    CreateSecretRequest, CreatedSecret, GetSecretRequest, SecretPayload, SecretRecord,
    SecretStore, SecretText, VersionQualifier,
};
pub use write::{CreateOptions, Writer};

#[cfg(feature = "aws")]
pub use aws::AwsSecretStore;

// Re-export the pure half so callers need only one crate.
pub use secretfold_tree::{ConfigTree, EnvScope, KeyScheme};
