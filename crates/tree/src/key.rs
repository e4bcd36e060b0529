//! Secret name scheme: delimiter, namespace, and environment handling
//!
//! Names are scoped with the namespace as the outermost prefix:
//! `<namespace><delim><environment><delim><segment>...<delim><leaf>`.
//! The same scheme drives both directions, so a name composed by
//! [`KeyScheme::compose`] always parses back to its original segments.

use serde::{Deserialize, Serialize};

/// Environment scoping for secret names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvScope {
    /// No environment scoping: no environment prefix is stripped on read or
    /// added on write. Reads see secrets from every environment.
    #[default]
    All,
    /// Scope reads and writes to a single named environment.
    Named(String),
}

impl EnvScope {
    /// Create a named environment scope.
    #[must_use]
    pub fn named(environment: impl Into<String>) -> Self {
        Self::Named(environment.into())
    }

    /// Check whether this scope is restricted to one environment.
    #[must_use]
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

/// Naming scheme shared by the read and write paths.
///
/// The delimiter must be identical on both paths: a secret written with one
/// delimiter and parsed with another will not have its prefixes stripped and
/// the full name lands in the tree as extra nesting levels.
///
/// Prefix stripping is anchored to the start of the name. A namespace or
/// environment string appearing further inside the name is left alone, and a
/// name carrying neither prefix parses as-is (a no-op, not an error).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyScheme {
    delimiter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(default)]
    environment: EnvScope,
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self::new("/")
    }
}

impl KeyScheme {
    /// Create a scheme with the given delimiter, no namespace, and no
    /// environment scoping.
    #[must_use]
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            namespace: None,
            environment: EnvScope::All,
        }
    }

    /// Set the namespace prefix (the outermost name component).
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Restrict the scheme to a single environment.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = EnvScope::Named(environment.into());
        self
    }

    /// Set the environment scope directly.
    #[must_use]
    pub fn with_env_scope(mut self, scope: EnvScope) -> Self {
        self.environment = scope;
        self
    }

    /// The configured delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The configured namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The configured environment scope.
    #[must_use]
    pub fn environment(&self) -> &EnvScope {
        &self.environment
    }

    /// Parse a secret name into an ordered path of segments.
    ///
    /// Strips one leading `namespace + delimiter` occurrence, then one
    /// leading `environment + delimiter` occurrence, then splits the
    /// remainder on the delimiter. Empty segments are dropped. The final
    /// segment is the leaf key; everything before it nests.
    #[must_use]
    pub fn parse(&self, name: &str) -> Vec<String> {
        let mut rest = name;
        if let Some(namespace) = &self.namespace {
            rest = strip_scope(rest, namespace, &self.delimiter);
        }
        if let EnvScope::Named(environment) = &self.environment {
            rest = strip_scope(rest, environment, &self.delimiter);
        }
        rest.split(self.delimiter.as_str())
            .filter(|segment| !segment.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Compose a full store name from path segments.
    ///
    /// Segments are joined with the delimiter, the environment prefix is
    /// prepended when the scope is named, and the namespace prefix is
    /// prepended last so it ends up outermost.
    #[must_use]
    pub fn compose<I, S>(&self, segments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut name = segments
            .into_iter()
            .map(|segment| segment.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(&self.delimiter);
        if let EnvScope::Named(environment) = &self.environment {
            name = format!("{environment}{}{name}", self.delimiter);
        }
        if let Some(namespace) = &self.namespace {
            name = format!("{namespace}{}{name}", self.delimiter);
        }
        name
    }
}

/// Strip one `prefix + delimiter` occurrence anchored at the start of the
/// name. Absent prefix is a no-op.
fn strip_scope<'a>(name: &'a str, prefix: &str, delimiter: &str) -> &'a str {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(delimiter))
        .unwrap_or(name)
}
