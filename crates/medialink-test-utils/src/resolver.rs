//! In-memory resolver double.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use medialink_meta::Metadata;
use medialink_resolvers::{Error, Resolver, Result};
use serde_json::Value;

/// How a [`MemoryResolver`] responds to calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    /// Answer from the data table
    #[default]
    Answer,
    /// Return an error for every item
    Fail,
    /// Panic on every item
    Panic,
}

/// A resolver answering from a table keyed by item name.
///
/// Clones share the same table, behavior and call counter, so a test can
/// keep a handle after registering the resolver and change its answers
/// between runs.
///
/// ```rust,no_run
/// use medialink_test_utils::MemoryResolver;
/// use serde_json::json;
///
/// let resolver = MemoryResolver::new("dummy");
/// resolver.set("test", json!({"actors": ["Sir George"]}));
/// ```
#[derive(Clone)]
pub struct MemoryResolver {
    id: String,
    data: Arc<Mutex<BTreeMap<String, Value>>>,
    behavior: Arc<Mutex<Behavior>>,
    calls: Arc<AtomicUsize>,
}

impl Default for MemoryResolver {
    fn default() -> Self {
        Self::new("dummy")
    }
}

impl MemoryResolver {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Arc::default(),
            behavior: Arc::default(),
            calls: Arc::default(),
        }
    }

    /// Set the fields reported for `item`. `fields` must be a JSON object.
    pub fn set(&self, item: &str, fields: Value) {
        self.data.lock().unwrap().insert(item.to_string(), fields);
    }

    /// Stop reporting anything for `item`.
    pub fn forget(&self, item: &str) {
        self.data.lock().unwrap().remove(item);
    }

    pub fn clear(&self) {
        self.data.lock().unwrap().clear();
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// Number of `get_metadata` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    pub fn into_arc(self) -> Arc<dyn Resolver> {
        Arc::new(self)
    }
}

impl Resolver for MemoryResolver {
    fn id(&self) -> &str {
        &self.id
    }

    fn get_metadata(&self, item: &Metadata, _options: &Value) -> Result<Option<Metadata>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = item.name().unwrap_or_default();

        let behavior = *self.behavior.lock().unwrap();
        match behavior {
            Behavior::Answer => {}
            Behavior::Fail => {
                return Err(Error::Failed {
                    resolver: self.id.clone(),
                    message: format!("no data for {name}"),
                });
            }
            Behavior::Panic => panic!("{} exploded on {}", self.id, name),
        }

        let found = self.data.lock().unwrap().get(name).cloned();
        Ok(found.and_then(|fields| Metadata::try_from(fields).ok()))
    }
}
