//! Names of every file the engine owns.
//!
//! Manifests ("TOC" files) live inside destination and classification
//! directories. Progress, event logs and cache records live in a Set's
//! cache directory.

use std::path::Path;

/// Manifest file naming.
///
/// Every manifest-family name starts with [`Toc::PREFIX`]. Per-set manifests
/// exist in three lifecycle states: current (`.toc-<set>`), done
/// (`.toc.done-<set>`) and old (`.toc.old-<set>`).
pub struct Toc;

impl Toc {
    /// Prefix shared by every manifest-family file.
    pub const PREFIX: &'static str = ".toc";
    /// Prefix of every finalized manifest, for any set.
    pub const DONE_PREFIX: &'static str = ".toc.done";
    /// User-maintained allowlist of names that must never be deleted.
    pub const EXTRA: &'static str = ".toc.extra";

    pub fn current(set: &str) -> String {
        format!(".toc-{}", set)
    }

    pub fn done(set: &str) -> String {
        format!(".toc.done-{}", set)
    }

    pub fn old(set: &str) -> String {
        format!(".toc.old-{}", set)
    }

    /// True for names reconciliation never treats as directory content.
    pub fn is_reserved(name: &str) -> bool {
        name.starts_with(Self::PREFIX)
    }

    /// True for manifest files safe-delete may remove.
    ///
    /// Matches `.toc`, `.toc-*` and `.toc.*`, except the extra allowlist.
    pub fn is_disposable(name: &str) -> bool {
        if name == Self::EXTRA {
            return false;
        }
        name == Self::PREFIX
            || name.starts_with(".toc-")
            || name.starts_with(".toc.")
    }
}

/// Bookkeeping files stored in a Set's cache directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheFile {
    /// Names of items processed in the current run
    Progress,
    /// Items a resolver could not identify
    UnknownLog,
    /// Resolvers that failed on an item
    FailedLog,
}

impl CacheFile {
    /// Default cache directory name, relative to a Set's source directory.
    pub const DEFAULT_DIR: &'static str = ".cache";
    /// Prefix of per-item cache records.
    pub const RECORD_PREFIX: &'static str = ".cache-";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::UnknownLog => "unknown.log",
            Self::FailedLog => "failed.log",
        }
    }
}

impl AsRef<Path> for CacheFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for CacheFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
