//! Manifest (TOC) files of one directory for one Set
//!
//! Each destination root and classification directory carries per-Set
//! manifests in three states:
//!
//! ```text
//!   append          finalize            rotate (next run)
//! ---------> .toc-<set> ------> .toc.done-<set> ------> .toc.old-<set>
//! ```
//!
//! Transitions are renames, so an interrupted run never leaves a half
//! written manifest behind.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use medialink_fs::{Toc, io};

use crate::Result;

#[derive(Debug, Clone)]
pub struct TocDir {
    dir: PathBuf,
    set: String,
}

impl TocDir {
    pub fn new(dir: impl Into<PathBuf>, set: &str) -> Self {
        Self {
            dir: dir.into(),
            set: set.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn current_path(&self) -> PathBuf {
        self.dir.join(Toc::current(&self.set))
    }

    pub fn done_path(&self) -> PathBuf {
        self.dir.join(Toc::done(&self.set))
    }

    pub fn old_path(&self) -> PathBuf {
        self.dir.join(Toc::old(&self.set))
    }

    /// Record that `name` was written in this directory during this run.
    pub fn append(&self, name: &str) -> Result<()> {
        io::append_line(&self.current_path(), name)?;
        Ok(())
    }

    /// True when this Set wrote into the directory during this run.
    pub fn has_current(&self) -> bool {
        self.current_path().is_file()
    }

    /// Drop the old manifest and demote the done manifest to old.
    pub fn rotate(&self) -> Result<()> {
        io::remove_file_if_exists(&self.old_path())?;
        let done = self.done_path();
        if done.is_file() {
            fs::rename(&done, self.old_path()).map_err(|e| medialink_fs::Error::io(&done, e))?;
        }
        Ok(())
    }

    /// Names that must survive reconciliation.
    ///
    /// The union of every done manifest in the directory, whichever Set
    /// wrote it, and this Set's current manifest.
    pub fn retained_names(&self) -> Result<HashSet<String>> {
        let mut names = HashSet::new();
        let entries = fs::read_dir(&self.dir).map_err(|e| medialink_fs::Error::io(&self.dir, e))?;
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            if file_name.to_string_lossy().starts_with(Toc::DONE_PREFIX) && entry.path().is_file()
            {
                names.extend(io::read_lines(&entry.path())?);
            }
        }
        names.extend(io::read_lines_if_exists(&self.current_path())?);
        Ok(names)
    }

    /// Promote the current manifest to done.
    pub fn finalize(&self) -> Result<()> {
        let current = self.current_path();
        fs::rename(&current, self.done_path())
            .map_err(|e| medialink_fs::Error::io(&current, e))?;
        Ok(())
    }
}

/// Names listed in a directory's extra allowlist.
///
/// A missing allowlist is empty; an unreadable one is logged and treated
/// as empty.
pub fn read_allowlist(dir: &Path) -> HashSet<String> {
    let path = dir.join(Toc::EXTRA);
    match io::read_lines_if_exists(&path) {
        Ok(names) => names.into_iter().collect(),
        Err(e) => {
            tracing::warn!(?path, error = %e, "Failed to read allowlist");
            HashSet::new()
        }
    }
}
