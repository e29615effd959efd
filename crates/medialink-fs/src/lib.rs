//! Filesystem primitives for medialink
//!
//! Provides the low-level pieces the organizing engine is built from:
//! lexical path arithmetic, atomic writes, newline-separated list files
//! (manifests, allowlists, progress and event logs) and content-hash keys.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::{CacheFile, Toc};
pub use error::{Error, Result};
pub use path::{escape_separators, normalize, relative_path, same_entry, same_path};
