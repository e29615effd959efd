//! Typed Set configuration
//!
//! A Set is one organizing job: a source directory scanned under a
//! [`ScanMode`], a list of resolvers with their options, and one or more
//! [`OutputGroup`]s receiving classification links.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use medialink_fs::CacheFile;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Which source entries a Set considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Regular files only (symlinks are followed)
    Files,
    /// Directories only (symlinks are followed)
    #[default]
    Directories,
    /// Every top-level entry, regardless of type
    Toplevel,
}

impl ScanMode {
    /// Check whether an entry at `path` passes this mode's type filter.
    pub fn admits(&self, path: &Path) -> bool {
        match self {
            ScanMode::Files => path.is_file(),
            ScanMode::Directories => path.is_dir(),
            ScanMode::Toplevel => true,
        }
    }
}

impl FromStr for ScanMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "files" => Ok(ScanMode::Files),
            "directories" => Ok(ScanMode::Directories),
            "toplevel" => Ok(ScanMode::Toplevel),
            _ => Err(Error::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Files => write!(f, "files"),
            ScanMode::Directories => write!(f, "directories"),
            ScanMode::Toplevel => write!(f, "toplevel"),
        }
    }
}

/// One grouping field or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupBy {
    One(String),
    Many(Vec<String>),
}

impl GroupBy {
    pub fn fields(&self) -> &[String] {
        match self {
            GroupBy::One(field) => std::slice::from_ref(field),
            GroupBy::Many(fields) => fields,
        }
    }
}

/// A destination directory and the metadata fields that classify into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputGroup {
    pub dest: PathBuf,
    #[serde(alias = "groupBy")]
    pub group_by: GroupBy,
}

impl OutputGroup {
    pub fn new(dest: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            group_by: GroupBy::One(field.into()),
        }
    }
}

/// Fully composed configuration of one Set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetConfig {
    pub name: String,

    #[serde(alias = "sourceDir")]
    pub source_dir: PathBuf,

    #[serde(default, alias = "scanMode")]
    pub scan_mode: ScanMode,

    /// Inclusion pattern matched against each item's full path
    #[serde(default)]
    pub regex: Option<String>,

    /// Resolver identifiers, applied in order
    #[serde(default, alias = "parsers")]
    pub resolvers: Vec<String>,

    /// Per-resolver options keyed by resolver identifier
    #[serde(default, alias = "parser_options", alias = "parserOptions")]
    pub resolver_options: BTreeMap<String, Value>,

    #[serde(default)]
    pub output: Vec<OutputGroup>,

    /// Defaults to `<source_dir>/.cache`
    #[serde(default, alias = "cacheDir")]
    pub cache_dir: Option<PathBuf>,

    #[serde(default, alias = "preferCachedData")]
    pub prefer_cached_data: bool,

    /// Skip reconciliation after a completed scan
    #[serde(default)]
    pub noclean: bool,

    /// Log reconciliation decisions without deleting anything
    #[serde(default)]
    pub fakeclean: bool,
}

impl SetConfig {
    pub fn new(name: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_dir: source_dir.into(),
            scan_mode: ScanMode::default(),
            regex: None,
            resolvers: Vec::new(),
            resolver_options: BTreeMap::new(),
            output: Vec::new(),
            cache_dir: None,
            prefer_cached_data: false,
            noclean: false,
            fakeclean: false,
        }
    }

    /// The effective cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| self.source_dir.join(CacheFile::DEFAULT_DIR))
    }

    /// Options for one resolver, or an empty mapping.
    pub fn options_for(&self, resolver: &str) -> Value {
        self.resolver_options
            .get(resolver)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// Serialized form of every resolver option.
    ///
    /// Cached metadata is only reused when its stored fingerprint equals
    /// this value. Keys serialize in sorted order, so equal options always
    /// produce equal fingerprints.
    pub fn fingerprint(&self) -> String {
        let map: Map<String, Value> = self
            .resolver_options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Value::Object(map).to_string()
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Path> {
        self.output.iter().map(|group| group.dest.as_path())
    }

    /// Resolve relative directories against `base`.
    pub fn anchor(&mut self, base: &Path) {
        let anchor = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        anchor(&mut self.source_dir);
        if let Some(cache_dir) = self.cache_dir.as_mut() {
            anchor(cache_dir);
        }
        for group in &mut self.output {
            anchor(&mut group.dest);
        }
    }
}
