//! Per-item metadata
//!
//! A [`Metadata`] value maps field names to scalars, lists or nested
//! mappings. Two fields are fixed: `name` (the item's identity within its
//! source directory) and `path` (where the item lives).

use std::collections::BTreeSet;
use std::path::Path;

use medialink_fs::escape_separators;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::merge::deep_merge;

/// Metadata fields for one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    pub const NAME: &'static str = "name";
    pub const PATH: &'static str = "path";

    pub fn new() -> Self {
        Self::default()
    }

    /// Seed metadata with the fixed `name` and `path` fields.
    pub fn for_item(name: &str, path: &Path) -> Self {
        let mut metadata = Self::new();
        metadata.insert(Self::NAME, Value::String(name.to_string()));
        metadata.insert(
            Self::PATH,
            Value::String(path.to_string_lossy().into_owned()),
        );
        metadata
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get(Self::NAME).and_then(Value::as_str)
    }

    pub fn path(&self) -> Option<&str> {
        self.0.get(Self::PATH).and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Deep merge `other` into this metadata (see [`deep_merge`]).
    pub fn merge(&mut self, other: &Metadata) {
        for (field, src) in &other.0 {
            match self.0.get_mut(field) {
                Some(dst) => deep_merge(dst, src),
                None => {
                    self.0.insert(field.clone(), src.clone());
                }
            }
        }
    }

    /// Replace fields with those of `other` at the top level only.
    ///
    /// Fields `other` lacks keep their current values.
    pub fn overlay(&mut self, other: Metadata) {
        for (field, value) in other.0 {
            self.0.insert(field, value);
        }
    }

    /// Classification values of a grouping field.
    ///
    /// A scalar yields one value, a list its de-duplicated elements, in
    /// sorted order. Nulls, nested structures and names that cannot be a
    /// directory (`""`, `.`, `..`) are dropped. Path separators are
    /// replaced so each value stays a single directory name.
    pub fn group_values(&self, field: &str) -> BTreeSet<String> {
        let mut values = BTreeSet::new();
        match self.0.get(field) {
            Some(Value::Array(items)) => {
                for item in items {
                    if let Some(value) = scalar_text(item) {
                        values.insert(value);
                    }
                }
            }
            Some(other) => {
                if let Some(value) = scalar_text(other) {
                    values.insert(value);
                }
            }
            None => {}
        }
        values
            .into_iter()
            .map(|v| escape_separators(&v))
            .filter(|v| !matches!(v.as_str(), "" | "." | ".."))
            .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => {
            tracing::debug!(?value, "Ignoring non-scalar classification value");
            None
        }
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Metadata {
    type Error = Value;

    /// Succeeds for JSON objects; hands any other value back.
    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
