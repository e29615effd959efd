//! Configuration file loading and Set composition
//!
//! A config file holds `default_settings`, `override_settings` and a list
//! of `sets`. Each Set is composed as
//! `default_settings <- set <- override_settings` with [`deep_merge`],
//! then deserialized into a typed [`SetConfig`].

use std::path::{Path, PathBuf};

use medialink_fs::ConfigStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SetConfig;
use crate::error::{Error, Result};
use crate::merge::deep_merge;

/// A parsed, not yet composed configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub default_settings: Value,

    #[serde(default)]
    pub override_settings: Value,

    #[serde(default)]
    pub sets: Vec<Value>,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Load a TOML, JSON or YAML config file.
    ///
    /// Relative directories in the composed Sets resolve against the
    /// directory containing the file.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(?path, "Loading config");
        let mut config: ConfigFile = ConfigStore::new().load(path)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Build a config from an already-parsed value tree.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::InvalidSet {
            index: 0,
            name: "<config>".into(),
            message: e.to_string(),
        })
    }

    /// Compose every Set, in configuration order.
    pub fn compose(&self) -> Result<Vec<SetConfig>> {
        self.sets
            .iter()
            .enumerate()
            .map(|(index, raw)| self.compose_one(index, raw))
            .collect()
    }

    /// Compose only the Set called `name`.
    pub fn compose_named(&self, name: &str) -> Result<SetConfig> {
        self.compose()?
            .into_iter()
            .find(|set| set.name == name)
            .ok_or_else(|| Error::SetNotFound {
                name: name.to_string(),
            })
    }

    /// Names of the configured Sets, without composing them.
    pub fn set_names(&self) -> Vec<String> {
        self.sets
            .iter()
            .filter_map(|raw| raw.get("name").and_then(Value::as_str))
            .map(String::from)
            .collect()
    }

    fn compose_one(&self, index: usize, raw: &Value) -> Result<SetConfig> {
        let mut combined = Value::Object(Map::new());
        for layer in [&self.default_settings, raw, &self.override_settings] {
            if !layer.is_null() {
                deep_merge(&mut combined, &canonical_keys(layer));
            }
        }

        let mut set: SetConfig =
            serde_json::from_value(combined).map_err(|e| Error::InvalidSet {
                index,
                name: raw
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("<unnamed>")
                    .to_string(),
                message: e.to_string(),
            })?;
        if let Some(base) = &self.base_dir {
            set.anchor(base);
        }
        Ok(set)
    }
}

/// Older spellings of Set keys and the names they stand for.
const LEGACY_KEYS: &[(&str, &str)] = &[
    ("sourceDir", "source_dir"),
    ("scanMode", "scan_mode"),
    ("cacheDir", "cache_dir"),
    ("parsers", "resolvers"),
    ("parser_options", "resolver_options"),
    ("parserOptions", "resolver_options"),
    ("preferCachedData", "prefer_cached_data"),
];

/// Rename legacy keys of one settings layer so layers using different
/// spellings merge into the same field.
fn canonical_keys(layer: &Value) -> Value {
    let Value::Object(map) = layer else {
        return layer.clone();
    };
    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        let key = LEGACY_KEYS
            .iter()
            .find(|(legacy, _)| legacy == key)
            .map_or(key.as_str(), |(_, name)| name);
        let value = match (key, value) {
            ("output", Value::Array(groups)) => {
                Value::Array(groups.iter().map(canonical_group).collect())
            }
            _ => value.clone(),
        };
        match out.get_mut(key) {
            Some(existing) => deep_merge(existing, &value),
            None => {
                out.insert(key.to_string(), value);
            }
        }
    }
    Value::Object(out)
}

fn canonical_group(group: &Value) -> Value {
    let mut group = group.clone();
    if let Value::Object(map) = &mut group
        && let Some(value) = map.remove("groupBy")
    {
        map.entry("group_by").or_insert(value);
    }
    group
}
