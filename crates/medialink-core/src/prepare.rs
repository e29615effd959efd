//! Set preparation
//!
//! Validates a [`SetConfig`] and binds everything a run needs: compiled
//! patterns, resolver instances and the effective cache directory. Every
//! configuration error surfaces here, before scanning starts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use medialink_meta::SetConfig;
use medialink_resolvers::{Resolver, ResolverRegistry};
use regex::Regex;
use serde_json::Value;

use crate::{Error, Result};

/// A resolver bound to one Set's options.
pub struct PreparedResolver {
    pub id: String,
    pub instance: Arc<dyn Resolver>,
    pub options: Value,
    /// Per-resolver inclusion pattern (`regex` option)
    pub pattern: Option<Regex>,
}

impl PreparedResolver {
    /// Whether this resolver should see the item at `path`.
    pub fn applies_to(&self, path: &str) -> bool {
        self.pattern.as_ref().is_none_or(|p| p.is_match(path))
    }
}

/// A validated Set, ready to scan.
pub struct PreparedSet {
    pub config: SetConfig,
    pub cache_dir: PathBuf,
    pub pattern: Option<Regex>,
    pub resolvers: Vec<PreparedResolver>,
}

impl PreparedSet {
    /// Validate `config` and bind its resolvers from `registry`.
    ///
    /// Creates the cache directory if needed.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown resolver, an invalid
    /// pattern, a missing source directory or a missing destination.
    pub fn prepare(config: &SetConfig, registry: &ResolverRegistry) -> Result<Self> {
        let set = &config.name;

        let mut resolvers = Vec::with_capacity(config.resolvers.len());
        for id in &config.resolvers {
            let options = config.options_for(id);
            let instance = registry.instantiate(id, &options).map_err(|_| Error::MissingResolver {
                set: set.clone(),
                resolver: id.clone(),
            })?;
            let pattern = match options.get("regex").and_then(Value::as_str) {
                Some(p) => Some(compile(set, p)?),
                None => None,
            };
            resolvers.push(PreparedResolver {
                id: id.clone(),
                instance,
                options,
                pattern,
            });
        }

        if !config.source_dir.is_dir() {
            return Err(Error::MissingSourceDir {
                set: set.clone(),
                path: config.source_dir.clone(),
            });
        }

        let cache_dir = config.cache_dir();
        fs::create_dir_all(&cache_dir).map_err(|e| medialink_fs::Error::io(&cache_dir, e))?;

        for dest in config.destinations() {
            if !dest.is_dir() {
                return Err(Error::MissingDestDir {
                    set: set.clone(),
                    path: dest.to_path_buf(),
                });
            }
        }

        let pattern = match &config.regex {
            Some(p) => Some(compile(set, p)?),
            None => None,
        };

        Ok(Self {
            config: config.clone(),
            cache_dir,
            pattern,
            resolvers,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }

    /// Paths the Scan Planner must never treat as items.
    pub fn omitted_paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.cache_dir.clone())
            .chain(self.config.destinations().map(Path::to_path_buf))
            .collect()
    }

    /// Paths reconciliation must never touch.
    pub fn protected_paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.config.source_dir.clone())
            .chain(self.omitted_paths())
            .collect()
    }
}

fn compile(set: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        set: set.to_string(),
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
