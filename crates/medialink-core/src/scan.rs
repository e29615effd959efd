//! Scan planning
//!
//! Lists a Set's source directory in name order and filters it by scan
//! mode, omitted paths, the inclusion pattern and the progress log. The
//! filters run lazily, one entry at a time, so a resumed run skips logged
//! items before doing any work on them.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use medialink_fs::same_path;

use crate::Result;
use crate::prepare::PreparedSet;

/// One entry of the source collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub path: PathBuf,
}

/// Enumerates the items a Set should process.
pub struct ScanPlanner<'a> {
    set: &'a PreparedSet,
    omitted: Vec<PathBuf>,
}

impl<'a> ScanPlanner<'a> {
    pub fn new(set: &'a PreparedSet) -> Self {
        Self {
            set,
            omitted: set.omitted_paths(),
        }
    }

    /// Items still to process, sorted by name.
    ///
    /// Names in `processed` are skipped.
    pub fn plan<'b>(
        &'b self,
        processed: &'b HashSet<String>,
    ) -> Result<impl Iterator<Item = Item> + 'b> {
        let source = self.set.source_dir();
        let mut names = Vec::new();
        for entry in fs::read_dir(source).map_err(|e| medialink_fs::Error::io(source, e))? {
            let entry = entry.map_err(|e| medialink_fs::Error::io(source, e))?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::warn!(name = ?raw, "Skipping non UTF-8 entry"),
            }
        }
        names.sort();

        Ok(names
            .into_iter()
            .filter(move |name| !processed.contains(name))
            .map(move |name| Item {
                path: source.join(&name),
                name,
            })
            .filter(move |item| self.admits(item)))
    }

    fn admits(&self, item: &Item) -> bool {
        if self.omitted.iter().any(|o| same_path(o, &item.path)) {
            return false;
        }
        if !self.set.config.scan_mode.admits(&item.path) {
            return false;
        }
        match &self.set.pattern {
            Some(pattern) => pattern.is_match(&item.path.to_string_lossy()),
            None => true,
        }
    }
}
