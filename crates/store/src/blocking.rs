//! Blocking facade for callers without an async runtime
//!
//! Synchronous startup code cannot suspend, so these helpers drive the async
//! read path to completion on a throwaway current-thread runtime. Calling
//! them from inside an async runtime returns [`StoreError::Runtime`] rather
//! than deadlocking on a nested `block_on`.

use crate::error::StoreError;
use crate::fetch::Fetcher;
use crate::loader::ConfigLoader;
use crate::store::{GetSecretRequest, SecretStore, SecretText};
use secretfold_tree::ConfigTree;

/// Load a config tree, blocking the calling thread.
///
/// # Errors
///
/// Fails with [`StoreError::Runtime`] when called from an async context or
/// when the runtime cannot be built; otherwise propagates whatever the
/// async load returns.
pub fn load<S, I, T>(loader: &ConfigLoader<S>, ids: I) -> Result<ConfigTree, StoreError>
where
    S: SecretStore,
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    run(loader.load(ids))?
}

/// Fetch one secret to text, blocking the calling thread.
///
/// # Errors
///
/// Fails with [`StoreError::Runtime`] when called from an async context or
/// when the runtime cannot be built; otherwise propagates whatever the
/// async fetch returns.
pub fn fetch<S: SecretStore>(
    fetcher: &Fetcher<S>,
    request: &GetSecretRequest,
) -> Result<SecretText, StoreError> {
    run(fetcher.fetch(request))?
}

fn run<F: std::future::Future>(future: F) -> Result<F::Output, StoreError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(StoreError::Runtime {
            message: "blocking call invoked from within an async runtime; use the async API"
                .to_string(),
        });
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| StoreError::Runtime {
            message: format!("failed to build runtime: {e}"),
        })?;
    Ok(runtime.block_on(future))
}
