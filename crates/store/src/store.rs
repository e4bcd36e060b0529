//! Store trait seam and wire record types
//!
//! The remote secret store is an opaque collaborator behind the
//! [`SecretStore`] trait: one fetch-by-id operation and one create
//! operation. The AWS Secrets Manager backend lives in [`crate::aws`]
//! (feature `aws`); tests supply their own implementations.

use crate::error::StoreError;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A secret as returned by the store. Immutable once fetched.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretRecord {
    /// Full store name, including any namespace/environment prefixes
    pub name: String,
    /// String value, possibly JSON-encoded
    pub secret_string: Option<String>,
    /// Binary value, for secrets stored as raw bytes
    pub secret_binary: Option<Vec<u8>>,
    /// Store-assigned resource identifier
    pub arn: Option<String>,
    /// Version the store served
    pub version_id: Option<String>,
}

impl SecretRecord {
    /// The string value, if the record carries one.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.secret_string.as_deref()
    }

    /// Consume the record into its decoded text value.
    ///
    /// Prefers the string value; falls back to UTF-8 decoding the binary
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingValue`] when the record has neither a
    /// string value nor UTF-8 binary.
    pub fn into_text(self) -> Result<SecretText, StoreError> {
        let Self {
            name,
            secret_string,
            secret_binary,
            ..
        } = self;
        if let Some(value) = secret_string {
            return Ok(SecretText::new(value));
        }
        if let Some(bytes) = secret_binary {
            return String::from_utf8(bytes)
                .map(SecretText::new)
                .map_err(|_| StoreError::MissingValue { secret_id: name });
        }
        Err(StoreError::MissingValue { secret_id: name })
    }
}

impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRecord")
            .field("name", &self.name)
            .field("secret_string", &self.secret_string.as_ref().map(|_| "[REDACTED]"))
            .field("secret_binary", &self.secret_binary.as_ref().map(Vec::len))
            .field("arn", &self.arn)
            .field("version_id", &self.version_id)
            .finish()
    }
}

/// A fetched secret value with redacted `Debug`/`Display` and memory zeroing
/// on drop. Access requires an explicit [`expose`](SecretText::expose) call.
#[derive(Clone)]
pub struct SecretText {
    inner: SecretString,
}

impl SecretText {
    /// Wrap a decoded secret value.
    #[must_use]
    pub fn new(value: String) -> Self {
        Self {
            inner: SecretString::from(value),
        }
    }

    /// Expose the secret value for use.
    ///
    /// The caller must not log, print, or persist the exposed value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }

    /// Length of the secret value without exposing it.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Check if the secret value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for SecretText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl std::fmt::Display for SecretText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Qualifier selecting which version of a secret to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionQualifier<'a> {
    /// An exact version id
    Id(&'a str),
    /// A staging label (e.g. `AWSCURRENT`)
    Stage(&'a str),
}

/// A single fetch-by-id request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSecretRequest {
    /// Secret id: a full store name or an ARN
    pub secret_id: String,

    /// Exact version to fetch (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    /// Staging label to fetch (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_stage: Option<String>,
}

impl GetSecretRequest {
    /// Request the default version of a secret.
    #[must_use]
    pub fn new(secret_id: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            version_id: None,
            version_stage: None,
        }
    }

    /// Request an exact version.
    #[must_use]
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Request a staging label.
    #[must_use]
    pub fn with_stage(mut self, version_stage: impl Into<String>) -> Self {
        self.version_stage = Some(version_stage.into());
        self
    }

    /// The single qualifier to send to the store.
    ///
    /// At most one qualifier goes on the wire; when both are set, the
    /// version id takes precedence over the stage.
    #[must_use]
    pub fn qualifier(&self) -> Option<VersionQualifier<'_>> {
        if let Some(id) = self.version_id.as_deref() {
            return Some(VersionQualifier::Id(id));
        }
        self.version_stage.as_deref().map(VersionQualifier::Stage)
    }
}

/// Value to publish with a create request.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretPayload {
    /// Sent verbatim as the secret string
    Text(String),
    /// JSON-encoded once at submit time
    Json(Value),
    /// Sent as-is as the secret binary
    Binary(Vec<u8>),
}

impl SecretPayload {
    /// Encode the payload into its wire form.
    ///
    /// Only the wire backends consume this; without one compiled in it is
    /// exercised solely by tests.
    #[cfg_attr(not(feature = "aws"), allow(dead_code))]
    pub(crate) fn encode(&self) -> Result<EncodedPayload, StoreError> {
        match self {
            Self::Text(value) => Ok(EncodedPayload::String(value.clone())),
            Self::Json(value) => serde_json::to_string(value)
                .map(EncodedPayload::String)
                .map_err(|e| {
                    StoreError::store("CreateSecret", format!("failed to encode JSON payload: {e}"))
                }),
            Self::Binary(bytes) => Ok(EncodedPayload::Binary(bytes.clone())),
        }
    }
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(_) => f.write_str("Text([REDACTED])"),
            Self::Json(_) => f.write_str("Json([REDACTED])"),
            Self::Binary(bytes) => write!(f, "Binary({} bytes)", bytes.len()),
        }
    }
}

/// Wire form of a [`SecretPayload`].
#[cfg_attr(not(feature = "aws"), allow(dead_code))]
pub(crate) enum EncodedPayload {
    String(String),
    Binary(Vec<u8>),
}

/// A create request as submitted to the store.
///
/// The name is already fully composed (namespace and environment prefixes
/// included); composition happens in [`crate::Writer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSecretRequest {
    /// Full store name
    pub name: String,
    /// Human-readable description (optional)
    pub description: Option<String>,
    /// Idempotency token (optional)
    pub client_request_token: Option<String>,
    /// KMS key to encrypt with (optional)
    pub kms_key_id: Option<String>,
    /// Key/value tags
    pub tags: Vec<(String, String)>,
    /// The secret value
    pub payload: SecretPayload,
}

/// Store acknowledgement of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSecret {
    /// Store-assigned resource identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    /// Full store name
    pub name: String,
    /// Version id assigned to the new value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

/// Trait for remote secret stores.
///
/// Implementors perform the raw remote calls; retry, name handling, and
/// tree assembly all happen above this seam.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch one secret record by id.
    async fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretRecord, StoreError>;

    /// Create one secret. Not retried by this crate.
    async fn create_secret(
        &self,
        request: &CreateSecretRequest,
    ) -> Result<CreatedSecret, StoreError>;
}

#[async_trait]
impl<S: SecretStore + ?Sized> SecretStore for &S {
    async fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretRecord, StoreError> {
        (**self).get_secret(request).await
    }

    async fn create_secret(
        &self,
        request: &CreateSecretRequest,
    ) -> Result<CreatedSecret, StoreError> {
        (**self).create_secret(request).await
    }
}

#[async_trait]
impl<S: SecretStore + ?Sized> SecretStore for std::sync::Arc<S> {
    async fn get_secret(&self, request: &GetSecretRequest) -> Result<SecretRecord, StoreError> {
        (**self).get_secret(request).await
    }

    async fn create_secret(
        &self,
        request: &CreateSecretRequest,
    ) -> Result<CreatedSecret, StoreError> {
        (**self).create_secret(request).await
    }
}
