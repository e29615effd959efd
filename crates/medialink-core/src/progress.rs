//! Resumable progress log
//!
//! Names of finished items are appended to `<cache_dir>/progress`. A
//! non-empty log at Set start means the previous run was interrupted; its
//! items are skipped and reconciliation waits for a run that completes.

use std::collections::HashSet;
use std::path::PathBuf;

use medialink_fs::{CacheFile, io};

use crate::Result;

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    path: PathBuf,
}

impl ProgressTracker {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: cache_dir.into().join(CacheFile::Progress),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Names already processed by the current run.
    pub fn load(&self) -> Result<HashSet<String>> {
        Ok(io::read_lines_if_exists(&self.path)?.into_iter().collect())
    }

    /// Mark `name` as processed.
    pub fn record(&self, name: &str) -> Result<()> {
        io::append_line(&self.path, name)?;
        Ok(())
    }

    /// Clear the log after a completed run.
    pub fn finish(&self) -> Result<()> {
        io::remove_file_if_exists(&self.path)?;
        Ok(())
    }
}
