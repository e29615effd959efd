//! Metadata resolvers for medialink
//!
//! A resolver derives metadata fields for one item. Resolvers are looked up
//! by identifier through a [`ResolverRegistry`] when a Set is prepared, so an
//! unknown identifier fails before any scanning starts.

pub mod error;
pub mod filename;
pub mod registry;
pub mod resolver;
pub mod table;
pub mod throttle;

pub use error::{Error, Result};
pub use filename::FilenameResolver;
pub use registry::ResolverRegistry;
pub use resolver::Resolver;
pub use table::TableResolver;
pub use throttle::{RateLimiter, Throttled};
