//! Error types for medialink-resolvers

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] medialink_fs::Error),

    #[error("Unknown resolver: {id}")]
    UnknownResolver { id: String },

    #[error("Resolver {resolver} requires option `{option}`")]
    MissingOption { resolver: String, option: String },

    #[error("Invalid metadata table at {path}: {message}")]
    InvalidTable { path: PathBuf, message: String },

    #[error("Resolver {resolver} failed: {message}")]
    Failed { resolver: String, message: String },
}
