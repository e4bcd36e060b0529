//! Publishing secrets under the configured naming scheme
//!
//! The write path is the one-shot inverse of the loader: it composes the
//! full store name from path segments and submits a single create request.
//! Writes are deliberately not retry-wrapped; only reads absorb throttle
//! signals in this crate, and callers needing write retries must add their
//! own.

use crate::error::StoreError;
use crate::store::{CreateSecretRequest, CreatedSecret, SecretPayload, SecretStore};
use secretfold_tree::KeyScheme;
use tracing::debug;

/// Optional metadata for a create request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Human-readable description
    pub description: Option<String>,
    /// Idempotency token
    pub client_request_token: Option<String>,
    /// KMS key to encrypt with
    pub kms_key_id: Option<String>,
    /// Key/value tags
    pub tags: Vec<(String, String)>,
}

impl CreateOptions {
    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the idempotency token.
    #[must_use]
    pub fn with_client_request_token(mut self, token: impl Into<String>) -> Self {
        self.client_request_token = Some(token.into());
        self
    }

    /// Set the KMS key id.
    #[must_use]
    pub fn with_kms_key_id(mut self, kms_key_id: impl Into<String>) -> Self {
        self.kms_key_id = Some(kms_key_id.into());
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }
}

/// Publishes new secrets under a [`KeyScheme`].
#[derive(Debug)]
pub struct Writer<S> {
    store: S,
    scheme: KeyScheme,
}

impl<S: SecretStore> Writer<S> {
    /// Create a writer.
    pub fn new(store: S, scheme: KeyScheme) -> Self {
        Self { store, scheme }
    }

    /// The naming scheme used to compose store names.
    #[must_use]
    pub fn scheme(&self) -> &KeyScheme {
        &self.scheme
    }

    /// Create a secret at the given logical path.
    ///
    /// The path is joined with the scheme's delimiter, then the environment
    /// prefix is prepended (when scoped), then the namespace prefix, so a
    /// secret written here reads back to the same path through
    /// [`KeyScheme::parse`].
    ///
    /// # Errors
    ///
    /// Any store failure propagates unchanged; the request is submitted
    /// exactly once.
    pub async fn create<T>(
        &self,
        path: &[T],
        payload: SecretPayload,
        options: CreateOptions,
    ) -> Result<CreatedSecret, StoreError>
    where
        T: AsRef<str>,
    {
        let name = self.scheme.compose(path.iter().map(AsRef::as_ref));
        let request = CreateSecretRequest {
            name,
            description: options.description,
            client_request_token: options.client_request_token,
            kms_key_id: options.kms_key_id,
            tags: options.tags,
            payload,
        };
        debug!(name = %request.name, "Creating secret");
        let created = self.store.create_secret(&request).await?;
        debug!(
            name = %created.name,
            version_id = ?created.version_id,
            "Secret created"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GetSecretRequest, SecretRecord};
    use async_trait::async_trait;
    use secretfold_tree::KeyScheme;
    use serde_json::json;
    use std::sync::Mutex;

    /// Captures create requests and acknowledges them.
    #[derive(Default)]
    struct CapturingStore {
        created: Mutex<Vec<CreateSecretRequest>>,
    }

    #[async_trait]
    impl SecretStore for CapturingStore {
        async fn get_secret(
            &self,
            _request: &GetSecretRequest,
        ) -> Result<SecretRecord, StoreError> {
            unimplemented!("not used by writer tests")
        }

        async fn create_secret(
            &self,
            request: &CreateSecretRequest,
        ) -> Result<CreatedSecret, StoreError> {
            self.created
                .lock()
                .expect("created lock poisoned")
                .push(request.clone());
            Ok(CreatedSecret {
                arn: Some(format!("arn:store:{}", request.name)),
                name: request.name.clone(),
                version_id: Some("v1".to_string()),
            })
        }
    }

    fn acme_prod() -> KeyScheme {
        KeyScheme::new("/")
            .with_namespace("acme")
            .with_environment("prod")
    }

    #[tokio::test]
    async fn create_composes_namespace_outermost() {
        let writer = Writer::new(CapturingStore::default(), acme_prod());
        let created = writer
            .create(
                &["db", "password"],
                SecretPayload::Text("s3cr3t".to_string()),
                CreateOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(created.name, "acme/prod/db/password");
        let captured = writer.store.created.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].name, "acme/prod/db/password");
    }

    #[tokio::test]
    async fn create_forwards_options() {
        let writer = Writer::new(CapturingStore::default(), acme_prod());
        let options = CreateOptions::default()
            .with_description("database password")
            .with_client_request_token("token-1")
            .with_kms_key_id("kms-key")
            .with_tag("team", "platform");
        writer
            .create(
                &["db", "password"],
                SecretPayload::Json(json!({"user": "admin"})),
                options,
            )
            .await
            .unwrap();

        let captured = writer.store.created.lock().unwrap();
        let request = &captured[0];
        assert_eq!(request.description.as_deref(), Some("database password"));
        assert_eq!(request.client_request_token.as_deref(), Some("token-1"));
        assert_eq!(request.kms_key_id.as_deref(), Some("kms-key"));
        assert_eq!(
            request.tags,
            vec![("team".to_string(), "platform".to_string())]
        );
    }

    #[tokio::test]
    async fn create_without_environment_scope() {
        let scheme = KeyScheme::new("/").with_namespace("acme");
        let writer = Writer::new(CapturingStore::default(), scheme);
        let created = writer
            .create(
                &["api", "token"],
                SecretPayload::Binary(vec![1, 2, 3]),
                CreateOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(created.name, "acme/api/token");
    }

    #[tokio::test]
    async fn create_propagates_store_errors_without_retry() {
        struct DenyingStore;

        #[async_trait]
        impl SecretStore for DenyingStore {
            async fn get_secret(
                &self,
                _request: &GetSecretRequest,
            ) -> Result<SecretRecord, StoreError> {
                unimplemented!("not used")
            }

            async fn create_secret(
                &self,
                request: &CreateSecretRequest,
            ) -> Result<CreatedSecret, StoreError> {
                Err(StoreError::store(
                    "CreateSecret",
                    format!("access denied for '{}'", request.name),
                ))
            }
        }

        let writer = Writer::new(DenyingStore, acme_prod());
        let err = writer
            .create(
                &["db", "password"],
                SecretPayload::Text("x".to_string()),
                CreateOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Store { .. }));
    }
}
