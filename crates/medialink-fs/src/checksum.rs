//! SHA-256 content keys
//!
//! Cache records are named after a hash of the item name so arbitrary
//! names map onto safe, fixed-length file names.

use sha2::{Digest, Sha256};

/// Compute the hex SHA-256 digest of a string.
pub fn content_key(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
