//! Error types for medialink-meta

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] medialink_fs::Error),

    #[error("Invalid set #{index} ({name}): {message}")]
    InvalidSet {
        index: usize,
        name: String,
        message: String,
    },

    #[error("Set not found: {name}")]
    SetNotFound { name: String },

    #[error("Invalid scan mode: {mode}")]
    InvalidMode { mode: String },
}
