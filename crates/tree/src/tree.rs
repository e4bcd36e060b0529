//! Nested config tree built from flat `(path, value)` pairs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A nested configuration mapping assembled from parsed secret names.
///
/// Leaves are [`serde_json::Value`], so a decoded secret can be a string,
/// number, boolean, null, list, or a whole nested object of its own.
/// Insertion order is irrelevant; colliding leaf writes follow last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree {
    entries: Map<String, Value>,
}

impl ConfigTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree by folding `(path, value)` pairs.
    #[must_use]
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Vec<S>, Value)>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for (path, value) in pairs {
            tree.insert(&path, value);
        }
        tree
    }

    /// Decode a raw secret value.
    ///
    /// Values that parse as JSON are stored decoded; anything else is kept
    /// as the raw string. Decode failure is never an error.
    #[must_use]
    pub fn decode_value(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    }

    /// Insert a value at the given path, creating intermediate mappings on
    /// demand.
    ///
    /// A non-mapping value occupying an intermediate slot is replaced by an
    /// empty mapping, and a leaf write replaces whatever is at the final
    /// segment: when one path is a strict prefix of another, the last write
    /// wins at the shared node. Empty paths are ignored.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], value: Value) {
        let Some((leaf, parents)) = path.split_last() else {
            return;
        };
        let mut node = &mut self.entries;
        for segment in parents {
            let slot = node
                .entry(segment.as_ref().to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(map) = slot.as_object_mut() else {
                // Just forced to an object above.
                return;
            };
            node = map;
        }
        node.insert(leaf.as_ref().to_string(), value);
    }

    /// Get a top-level entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Walk a path of segments down the tree.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.entries.get(*first)?;
        for segment in rest {
            current = current.as_object()?.get(*segment)?;
        }
        Some(current)
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the tree into a plain JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }

    /// Iterate over top-level entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl From<ConfigTree> for Value {
    fn from(tree: ConfigTree) -> Self {
        tree.into_value()
    }
}

impl<'a> IntoIterator for &'a ConfigTree {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
