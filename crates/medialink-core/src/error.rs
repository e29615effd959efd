//! Error types for medialink-core

use std::path::PathBuf;

/// Result type for medialink-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in medialink-core operations
///
/// The first four variants are configuration errors: they are raised while
/// a Set is prepared, before any item is scanned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source directory missing or not a directory
    #[error("Set {set} has an invalid source directory {path}")]
    MissingSourceDir { set: String, path: PathBuf },

    /// A configured resolver is not registered
    #[error("Set {set} can't load resolver {resolver}")]
    MissingResolver { set: String, resolver: String },

    /// An output destination does not exist
    #[error("Set {set} is missing an output directory {path}")]
    MissingDestDir { set: String, path: PathBuf },

    /// An inclusion pattern does not compile
    #[error("Set {set} has an invalid pattern {pattern:?}: {message}")]
    InvalidPattern {
        set: String,
        pattern: String,
        message: String,
    },

    /// Filesystem error from medialink-fs
    #[error(transparent)]
    Fs(#[from] medialink_fs::Error),

    /// Configuration error from medialink-meta
    #[error(transparent)]
    Meta(#[from] medialink_meta::Error),

    /// Resolver error from medialink-resolvers
    #[error(transparent)]
    Resolver(#[from] medialink_resolvers::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
