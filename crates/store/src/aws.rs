//! AWS Secrets Manager backend
//!
//! Thin glue over `aws-sdk-secretsmanager`: builds the SDK client from the
//! default credential/region chain and maps `GetSecretValue`/`CreateSecret`
//! onto the [`SecretStore`] trait. Credential resolution, signing, and
//! transport all belong to the SDK; the only logic here is mapping SDK
//! errors onto the local taxonomy so the retry policy can recognize
//! throttling.

use crate::error::StoreError;
use crate::store::{
    CreateSecretRequest, CreatedSecret, EncodedPayload, GetSecretRequest, SecretRecord,
    SecretStore, VersionQualifier,
};
use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::primitives::Blob;
use aws_sdk_secretsmanager::types::Tag;

/// A [`SecretStore`] backed by AWS Secrets Manager.
#[derive(Debug, Clone)]
pub struct AwsSecretStore {
    client: Client,
}

impl AwsSecretStore {
    /// Build a store from the default AWS configuration chain.
    pub async fn new() -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Build a store pinned to a region, overriding the default chain.
    pub async fn with_region(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.into()))
            .load()
            .await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Wrap an existing SDK client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// Map an SDK error onto the local taxonomy.
///
/// Throttling is the only transient signal; not-found gets its own variant
/// so callers can distinguish it, and everything else is a fatal store
/// error carrying the SDK's full error chain.
fn classify<E>(operation: &str, secret_id: &str, err: SdkError<E>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err.code() {
        Some("ThrottlingException" | "TooManyRequestsException") => StoreError::Throttled {
            secret_id: secret_id.to_string(),
        },
        Some("ResourceNotFoundException") => StoreError::NotFound {
            secret_id: secret_id.to_string(),
        },
        _ => StoreError::store(operation, format!("{}", DisplayErrorContext(&err))),
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretRecord, StoreError> {
        let mut call = self.client.get_secret_value().secret_id(&request.secret_id);
        match request.qualifier() {
            Some(VersionQualifier::Id(version_id)) => call = call.version_id(version_id),
            Some(VersionQualifier::Stage(stage)) => call = call.version_stage(stage),
            None => {}
        }

        let output = call
            .send()
            .await
            .map_err(|e| classify("GetSecretValue", &request.secret_id, e))?;

        Ok(SecretRecord {
            name: output
                .name()
                .unwrap_or(request.secret_id.as_str())
                .to_string(),
            secret_string: output.secret_string().map(ToString::to_string),
            secret_binary: output.secret_binary().map(|blob| blob.as_ref().to_vec()),
            arn: output.arn().map(ToString::to_string),
            version_id: output.version_id().map(ToString::to_string),
        })
    }

    async fn create_secret(
        &self,
        request: &CreateSecretRequest,
    ) -> Result<CreatedSecret, StoreError> {
        let mut call = self.client.create_secret().name(&request.name);
        if let Some(description) = &request.description {
            call = call.description(description);
        }
        if let Some(token) = &request.client_request_token {
            call = call.client_request_token(token);
        }
        if let Some(kms_key_id) = &request.kms_key_id {
            call = call.kms_key_id(kms_key_id);
        }
        for (key, value) in &request.tags {
            call = call.tags(Tag::builder().key(key).value(value).build());
        }
        match request.payload.encode()? {
            EncodedPayload::String(value) => call = call.secret_string(value),
            EncodedPayload::Binary(bytes) => call = call.secret_binary(Blob::new(bytes)),
        }

        let output = call
            .send()
            .await
            .map_err(|e| classify("CreateSecret", &request.name, e))?;

        Ok(CreatedSecret {
            arn: output.arn().map(ToString::to_string),
            name: output.name().unwrap_or(request.name.as_str()).to_string(),
            version_id: output.version_id().map(ToString::to_string),
        })
    }
}
