//! Unknown-item and crashed-resolver event logs
//!
//! Both logs are append-only, human-readable, and live in the Set's cache
//! directory. They are cleared when a fresh (non-resumed) run starts.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use medialink_fs::{CacheFile, io};

use crate::Result;

#[derive(Debug, Clone)]
pub struct EventLog {
    dir: PathBuf,
}

impl EventLog {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: cache_dir.into(),
        }
    }

    pub fn unknown_path(&self) -> PathBuf {
        self.dir.join(CacheFile::UnknownLog)
    }

    pub fn failed_path(&self) -> PathBuf {
        self.dir.join(CacheFile::FailedLog)
    }

    /// Remove both logs.
    pub fn reset(&self) -> Result<()> {
        io::remove_file_if_exists(&self.unknown_path())?;
        io::remove_file_if_exists(&self.failed_path())?;
        Ok(())
    }

    /// Record that `resolver` could not identify `item`.
    pub fn unknown(&self, resolver: &str, item: &str) {
        tracing::warn!(resolver, item, "Resolver couldn't locate item");
        let line = format!("{} {} couldn't locate {}", timestamp(), resolver, item);
        append(&self.unknown_path(), &line);
    }

    /// Record that `resolver` failed on `item`.
    pub fn crashed(&self, resolver: &str, item: &str, error: &str) {
        tracing::warn!(resolver, item, error, "Resolver crashed");
        let line = format!(
            "{} {} crashed while parsing {}: {}",
            timestamp(),
            resolver,
            item,
            error
        );
        append(&self.failed_path(), &line);
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

// Losing an event line must not stop the run
fn append(path: &Path, line: &str) {
    if let Err(e) = io::append_line(path, line) {
        tracing::warn!(?path, error = %e, "Failed to write event log");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn events_append_and_reset() {
        let dir = tempdir().unwrap();
        let log = EventLog::new(dir.path());

        log.unknown("table", "test");
        log.crashed("filename", "test", "boom");
        log.unknown("table", "test2");

        let unknown = io::read_lines(&log.unknown_path()).unwrap();
        assert_eq!(unknown.len(), 2);
        assert!(unknown[0].ends_with("table couldn't locate test"));
        let failed = io::read_lines(&log.failed_path()).unwrap();
        assert!(failed[0].ends_with("filename crashed while parsing test: boom"));

        log.reset().unwrap();
        assert!(!log.unknown_path().exists());
        assert!(!log.failed_path().exists());
    }
}
