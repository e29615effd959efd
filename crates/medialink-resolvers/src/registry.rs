//! Resolver registry
//!
//! Maps resolver identifiers to implementations. Built-ins are registered by
//! [`ResolverRegistry::with_builtins`]; embedders and tests add their own
//! with [`ResolverRegistry::register`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::filename::FilenameResolver;
use crate::resolver::Resolver;
use crate::table::TableResolver;
use crate::throttle::Throttled;

/// Option key that puts a resolver instance behind a rate limiter.
pub const THROTTLE_OPTION: &str = "throttle_ms";

/// Central registry of resolvers, keyed by identifier.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: BTreeMap<String, Arc<dyn Resolver>>,
}

impl ResolverRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with all built-in resolvers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FilenameResolver::new()));
        registry.register(Arc::new(TableResolver::new()));
        registry
    }

    /// Register a resolver under its own identifier, replacing any previous one.
    pub fn register(&mut self, resolver: Arc<dyn Resolver>) {
        self.resolvers.insert(resolver.id().to_string(), resolver);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resolvers.contains_key(id)
    }

    /// List all registered identifiers (sorted).
    pub fn list(&self) -> Vec<&str> {
        self.resolvers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Produce the resolver instance a Set will call.
    ///
    /// When `options` carries [`THROTTLE_OPTION`], the returned instance
    /// owns its own rate limiter.
    pub fn instantiate(&self, id: &str, options: &Value) -> Result<Arc<dyn Resolver>> {
        let resolver = self
            .resolvers
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownResolver { id: id.to_string() })?;

        match options.get(THROTTLE_OPTION).and_then(Value::as_u64) {
            Some(ms) if ms > 0 => {
                tracing::debug!(resolver = id, interval_ms = ms, "Throttling resolver");
                Ok(Arc::new(Throttled::new(resolver, Duration::from_millis(ms))))
            }
            _ => Ok(resolver),
        }
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("resolvers", &self.list())
            .finish()
    }
}
