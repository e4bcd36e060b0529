//! Assembling a config tree from many secrets
//!
//! The top-level read path: fetch all requested records concurrently (each
//! fetch guarded by its own retry budget), strip prefixes from the returned
//! names, decode values, and fold everything into one [`ConfigTree`]. A
//! load either fully succeeds or fully fails; no partial tree is returned.

use crate::error::StoreError;
use crate::fetch::{Fetcher, RetryConfig};
use crate::store::{GetSecretRequest, SecretStore};
use futures::future::try_join_all;
use secretfold_tree::{ConfigTree, KeyScheme};
use serde_json::Value;
use tracing::{debug, warn};

/// Loads groups of secrets into one nested configuration object.
#[derive(Debug)]
pub struct ConfigLoader<S> {
    fetcher: Fetcher<S>,
    scheme: KeyScheme,
}

impl<S: SecretStore> ConfigLoader<S> {
    /// Create a loader with the default retry policy.
    pub fn new(store: S, scheme: KeyScheme) -> Self {
        Self {
            fetcher: Fetcher::new(store),
            scheme,
        }
    }

    /// Create a loader with an explicit retry policy.
    pub fn with_retry(store: S, scheme: KeyScheme, retry: RetryConfig) -> Self {
        Self {
            fetcher: Fetcher::with_retry(store, retry),
            scheme,
        }
    }

    /// The naming scheme used to parse returned record names.
    #[must_use]
    pub fn scheme(&self) -> &KeyScheme {
        &self.scheme
    }

    /// The underlying fetcher, for single-secret reads.
    #[must_use]
    pub fn fetcher(&self) -> &Fetcher<S> {
        &self.fetcher
    }

    /// Fetch the default versions of the given secret ids and fold them
    /// into one tree.
    ///
    /// # Errors
    ///
    /// Fails if any single fetch fails; nothing is returned from the
    /// fetches that succeeded.
    pub async fn load<I, T>(&self, ids: I) -> Result<ConfigTree, StoreError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let requests: Vec<GetSecretRequest> =
            ids.into_iter().map(GetSecretRequest::new).collect();
        self.load_requests(&requests).await
    }

    /// Fetch explicit requests (with version/stage qualifiers) and fold
    /// them into one tree.
    ///
    /// # Errors
    ///
    /// Fails if any single fetch fails.
    pub async fn load_requests(
        &self,
        requests: &[GetSecretRequest],
    ) -> Result<ConfigTree, StoreError> {
        let pairs = try_join_all(requests.iter().map(|request| self.fetch_pair(request))).await?;
        let tree = ConfigTree::from_pairs(pairs);
        debug!(
            secrets = requests.len(),
            top_level_keys = tree.len(),
            "Assembled config tree"
        );
        Ok(tree)
    }

    /// Fetch a single secret id into a (usually single-leaf) tree.
    ///
    /// # Errors
    ///
    /// Fails if the fetch fails.
    pub async fn load_one(&self, id: impl Into<String>) -> Result<ConfigTree, StoreError> {
        self.load_requests(&[GetSecretRequest::new(id)]).await
    }

    async fn fetch_pair(
        &self,
        request: &GetSecretRequest,
    ) -> Result<(Vec<String>, Value), StoreError> {
        let record = self.fetcher.fetch_raw(request).await?;
        let path = self.scheme.parse(&record.name);
        if path.is_empty() {
            warn!(
                name = %record.name,
                "Secret name has no path segments after prefix stripping; skipping"
            );
        }
        let text = record.into_text()?;
        Ok((path, ConfigTree::decode_value(text.expose())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CreateSecretRequest, CreatedSecret, SecretRecord};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    struct MapStore {
        secrets: HashMap<String, String>,
    }

    impl MapStore {
        fn new<const N: usize>(entries: [(&str, &str); N]) -> Self {
            Self {
                secrets: entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl SecretStore for MapStore {
        async fn get_secret(
            &self,
            request: &GetSecretRequest,
        ) -> Result<SecretRecord, StoreError> {
            let value =
                self.secrets
                    .get(&request.secret_id)
                    .ok_or_else(|| StoreError::NotFound {
                        secret_id: request.secret_id.clone(),
                    })?;
            Ok(SecretRecord {
                name: request.secret_id.clone(),
                secret_string: Some(value.clone()),
                secret_binary: None,
                arn: None,
                version_id: None,
            })
        }

        async fn create_secret(
            &self,
            _request: &CreateSecretRequest,
        ) -> Result<CreatedSecret, StoreError> {
            unimplemented!("not used by loader tests")
        }
    }

    fn acme_prod() -> KeyScheme {
        KeyScheme::new("/")
            .with_namespace("acme")
            .with_environment("prod")
    }

    #[tokio::test]
    async fn load_builds_nested_tree() {
        let store = MapStore::new([("acme/prod/db/password", "s3cr3t")]);
        let loader = ConfigLoader::new(store, acme_prod());
        let tree = loader.load(["acme/prod/db/password"]).await.unwrap();
        assert_eq!(tree.into_value(), json!({"db": {"password": "s3cr3t"}}));
    }

    #[tokio::test]
    async fn load_merges_sibling_secrets() {
        let store = MapStore::new([
            ("acme/prod/db/host", "localhost"),
            ("acme/prod/db/port", "5432"),
        ]);
        let loader = ConfigLoader::new(store, acme_prod());
        let tree = loader
            .load(["acme/prod/db/host", "acme/prod/db/port"])
            .await
            .unwrap();
        assert_eq!(
            tree.into_value(),
            json!({"db": {"host": "localhost", "port": 5432}})
        );
    }

    #[tokio::test]
    async fn load_decodes_json_document_values() {
        let store = MapStore::new([("acme/prod/db", r#"{"user": "admin", "ssl": true}"#)]);
        let loader = ConfigLoader::new(store, acme_prod());
        let tree = loader.load_one("acme/prod/db").await.unwrap();
        assert_eq!(
            tree.into_value(),
            json!({"db": {"user": "admin", "ssl": true}})
        );
    }

    #[tokio::test]
    async fn load_fails_whole_batch_on_missing_secret() {
        let store = MapStore::new([("acme/prod/db/host", "localhost")]);
        let loader = ConfigLoader::new(store, acme_prod());
        let err = loader
            .load(["acme/prod/db/host", "acme/prod/db/missing"])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn load_env_all_keeps_environment_segments() {
        let store = MapStore::new([
            ("acme/prod/db/host", "prod-db"),
            ("acme/staging/db/host", "staging-db"),
        ]);
        let loader = ConfigLoader::new(store, KeyScheme::new("/").with_namespace("acme"));
        let tree = loader
            .load(["acme/prod/db/host", "acme/staging/db/host"])
            .await
            .unwrap();
        assert_eq!(
            tree.into_value(),
            json!({
                "prod": {"db": {"host": "prod-db"}},
                "staging": {"db": {"host": "staging-db"}},
            })
        );
    }

    #[tokio::test]
    async fn load_empty_id_list_yields_empty_tree() {
        let store = MapStore::new([]);
        let loader = ConfigLoader::new(store, acme_prod());
        let tree = loader.load(Vec::<String>::new()).await.unwrap();
        assert!(tree.is_empty());
    }
}
