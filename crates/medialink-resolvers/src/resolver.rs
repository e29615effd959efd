//! The resolver capability

use medialink_meta::Metadata;
use serde_json::Value;

use crate::error::Result;

/// Derives metadata for one item.
///
/// `item` carries at least the fixed `name` and `path` fields plus whatever
/// earlier resolvers produced. Implementations must not modify the
/// filesystem and should give the same answer for the same input.
///
/// Returning `Ok(None)` means the resolver does not know the item; this is
/// recorded but is not an error.
pub trait Resolver: Send + Sync {
    /// Identifier used in configuration (e.g. "filename", "table")
    fn id(&self) -> &str;

    fn get_metadata(&self, item: &Metadata, options: &Value) -> Result<Option<Metadata>>;
}
