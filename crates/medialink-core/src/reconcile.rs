//! Manifest-based reconciliation
//!
//! After a Set finishes scanning, each output destination is swept: any
//! entry that no manifest vouches for is removed, provided the engine can
//! tell it created it. The sweep visits the destination root and each
//! classification directory below it.
//!
//! ```text
//! dest/                     .toc-<set> lists classification names
//! +-- Alice/                .toc-<set> lists item names
//! |   +-- item -> ../../All/item
//! +-- Bob/                  no longer listed: safe-deleted
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use medialink_fs::{Toc, io, same_entry};

use crate::Result;
use crate::prepare::PreparedSet;
use crate::toc::{TocDir, read_allowlist};

/// Levels below a destination root that are reconciled independently.
const RECURSE_LEVELS: usize = 1;

/// What a reconciliation pass removed, or would remove in a dry run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed_links: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    /// Stale entries left in place because the engine did not create them
    pub kept: Vec<PathBuf>,
    pub dry_run: bool,
}

impl CleanupReport {
    pub fn is_empty(&self) -> bool {
        self.removed_links.is_empty() && self.removed_dirs.is_empty() && self.kept.is_empty()
    }
}

pub struct Reconciler<'a> {
    set: &'a PreparedSet,
    protected: Vec<PathBuf>,
}

impl<'a> Reconciler<'a> {
    pub fn new(set: &'a PreparedSet) -> Self {
        Self {
            set,
            protected: set.protected_paths(),
        }
    }

    fn dry_run(&self) -> bool {
        self.set.config.fakeclean
    }

    /// Sweep every output destination of the Set.
    ///
    /// Failures are logged per directory and never abort the sweep.
    pub fn run(&self) -> CleanupReport {
        tracing::info!(set = %self.set.name(), dry_run = self.dry_run(), "Cleaning up old files");
        let mut report = CleanupReport {
            dry_run: self.dry_run(),
            ..Default::default()
        };
        for dest in self.set.config.destinations() {
            if let Err(e) = self.clean_dir(dest, RECURSE_LEVELS, &mut report) {
                tracing::warn!(path = ?dest, error = %e, "Failed to reconcile destination");
            }
        }
        report
    }

    fn clean_dir(&self, dir: &Path, levels: usize, report: &mut CleanupReport) -> Result<()> {
        let toc = TocDir::new(dir, self.set.name());
        if !toc.has_current() {
            return Ok(());
        }

        toc.rotate()?;
        let retained = toc.retained_names()?;
        let allowed = read_allowlist(dir);

        for name in sorted_names(dir)? {
            if Toc::is_reserved(&name) {
                continue;
            }
            let path = dir.join(&name);
            if self.protected.iter().any(|p| same_entry(p, &path)) {
                continue;
            }

            if retained.contains(&name) || allowed.contains(&name) {
                if levels > 0
                    && is_real_dir(&path)
                    && let Err(e) = self.clean_dir(&path, levels - 1, report)
                {
                    tracing::warn!(?path, error = %e, "Failed to reconcile directory");
                }
                continue;
            }

            if let Err(e) = self.remove_stale(&path, report) {
                tracing::warn!(?path, error = %e, "Failed to remove stale entry");
            }
        }

        toc.finalize()
    }

    fn remove_stale(&self, path: &Path, report: &mut CleanupReport) -> Result<()> {
        let meta = fs::symlink_metadata(path).map_err(|e| medialink_fs::Error::io(path, e))?;
        let file_type = meta.file_type();

        if file_type.is_symlink() {
            if self.dry_run() {
                tracing::debug!(?path, "Would remove extra link");
            } else {
                tracing::debug!(?path, "Removing extra link");
                io::remove_symlink(path)?;
            }
            report.removed_links.push(path.to_path_buf());
        } else if file_type.is_dir() {
            if self.dry_run() {
                tracing::debug!(?path, "Would remove extra dir");
                report.removed_dirs.push(path.to_path_buf());
            } else {
                tracing::debug!(?path, "Removing extra dir");
                safe_delete_dir(path, report)?;
            }
        } else {
            tracing::warn!(?path, "Not removing extra file");
            report.kept.push(path.to_path_buf());
        }
        Ok(())
    }
}

/// Remove what the engine owns inside `dir`, then `dir` itself if empty.
///
/// Symlinks and manifest files go, subdirectories are handled the same way
/// first, and names on the directory's allowlist are skipped. Any other file
/// stays, which leaves the directory in place.
pub fn safe_delete_dir(dir: &Path, report: &mut CleanupReport) -> Result<()> {
    let allowed = read_allowlist(dir);

    for name in sorted_names(dir)? {
        if allowed.contains(&name) {
            continue;
        }
        let path = dir.join(&name);
        if let Err(e) = delete_owned(&path, &name, report) {
            tracing::warn!(?path, error = %e, "Error while safely cleaning");
        }
    }

    if sorted_names(dir)?.is_empty() {
        fs::remove_dir(dir).map_err(|e| medialink_fs::Error::io(dir, e))?;
        report.removed_dirs.push(dir.to_path_buf());
    } else {
        tracing::warn!(path = ?dir, "Directory holds unknown content, not removing");
        report.kept.push(dir.to_path_buf());
    }
    Ok(())
}

fn delete_owned(path: &Path, name: &str, report: &mut CleanupReport) -> Result<()> {
    let file_type = fs::symlink_metadata(path)
        .map_err(|e| medialink_fs::Error::io(path, e))?
        .file_type();

    if file_type.is_symlink() {
        io::remove_symlink(path)?;
        report.removed_links.push(path.to_path_buf());
    } else if file_type.is_dir() {
        safe_delete_dir(path, report)?;
    } else if file_type.is_file() && Toc::is_disposable(name) {
        io::remove_file_if_exists(path)?;
    } else {
        report.kept.push(path.to_path_buf());
    }
    Ok(())
}

fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
}

// Non UTF-8 names can't appear in a manifest, so they are kept
fn sorted_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| medialink_fs::Error::io(dir, e))? {
        let entry = entry.map_err(|e| medialink_fs::Error::io(dir, e))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => tracing::warn!(path = ?dir, name = ?raw, "Leaving non UTF-8 entry"),
        }
    }
    names.sort();
    Ok(names)
}
