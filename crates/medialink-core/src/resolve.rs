//! Metadata resolution
//!
//! Runs a Set's resolvers in order, merging each answer into the metadata
//! accumulated so far, then lays the result over the cached record.

use std::panic::{self, AssertUnwindSafe};

use medialink_meta::Metadata;

use crate::events::EventLog;
use crate::prepare::PreparedSet;
use crate::scan::Item;

/// Outcome of resolving one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub metadata: Metadata,
    /// True when cached data was returned without calling any resolver
    pub from_cache: bool,
    /// Resolvers that did not know the item
    pub unknown: Vec<String>,
    /// Resolvers that failed on the item
    pub crashed: Vec<String>,
}

pub struct MetadataResolver<'a> {
    set: &'a PreparedSet,
    events: &'a EventLog,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(set: &'a PreparedSet, events: &'a EventLog) -> Self {
        Self { set, events }
    }

    /// Resolve the final metadata for `item`.
    ///
    /// With `prefer_cached_data`, a usable cached record (one with a `name`)
    /// is returned untouched. Otherwise every applicable resolver runs; a
    /// resolver returning no result or failing is logged and skipped. The
    /// merged result replaces cached fields at the top level, and cached
    /// fields no resolver produced this time are kept.
    pub fn resolve(&self, item: &Item, cached: Option<Metadata>) -> Resolution {
        if let Some(cached) = &cached
            && cached.name().is_some()
        {
            if self.set.config.prefer_cached_data {
                tracing::debug!(item = %item.name, "Preferring cached data");
                return Resolution {
                    metadata: cached.clone(),
                    from_cache: true,
                    unknown: Vec::new(),
                    crashed: Vec::new(),
                };
            }
            tracing::debug!(item = %item.name, "Loaded cached data");
        }

        let mut unknown = Vec::new();
        let mut crashed = Vec::new();
        let mut fresh = Metadata::for_item(&item.name, &item.path);

        for resolver in &self.set.resolvers {
            let path = fresh.path().unwrap_or_default().to_string();
            if !resolver.applies_to(&path) {
                continue;
            }

            let call = panic::catch_unwind(AssertUnwindSafe(|| {
                resolver.instance.get_metadata(&fresh, &resolver.options)
            }));
            match call {
                Ok(Ok(Some(found))) => fresh.merge(&found),
                Ok(Ok(None)) => {
                    self.events.unknown(&resolver.id, &item.name);
                    unknown.push(resolver.id.clone());
                }
                Ok(Err(e)) => {
                    self.events.crashed(&resolver.id, &item.name, &e.to_string());
                    crashed.push(resolver.id.clone());
                }
                Err(payload) => {
                    self.events
                        .crashed(&resolver.id, &item.name, &panic_message(payload.as_ref()));
                    crashed.push(resolver.id.clone());
                }
            }
        }

        let mut metadata = cached.unwrap_or_default();
        metadata.overlay(fresh);
        Resolution {
            metadata,
            from_cache: false,
            unknown,
            crashed,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
