//! Output materialization
//!
//! Turns an item's final metadata into classification directories and
//! symlinks under every output destination, appending each name written to
//! the matching manifest so reconciliation can tell it apart from stale
//! entries.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use medialink_fs::{io, relative_path};
use medialink_meta::Metadata;

use crate::Result;
use crate::prepare::PreparedSet;
use crate::scan::Item;
use crate::toc::TocDir;

pub struct OutputMaterializer<'a> {
    set: &'a PreparedSet,
}

impl<'a> OutputMaterializer<'a> {
    pub fn new(set: &'a PreparedSet) -> Self {
        Self { set }
    }

    /// Link `item` into every classification directory its metadata names.
    ///
    /// Grouping fields absent from `metadata` are skipped.
    pub fn materialize(&self, item: &Item, metadata: &Metadata) -> Result<()> {
        for group in &self.set.config.output {
            let dest_toc = TocDir::new(&group.dest, self.set.name());
            for field in group.group_by.fields() {
                for value in metadata.group_values(field) {
                    tracing::debug!(item = %item.name, field = %field, value = %value, "Sorting item");
                    self.link_into(&dest_toc, item, &value)?;
                }
            }
        }
        Ok(())
    }

    fn link_into(&self, dest_toc: &TocDir, item: &Item, value: &str) -> Result<()> {
        let value_dir = dest_toc.dir().join(value);
        match fs::symlink_metadata(&value_dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(meta) if meta.file_type().is_symlink() && value_dir.is_dir() => {
                // Nothing is written through a link
                tracing::warn!(path = ?value_dir, "Classification directory is a symlink, skipping");
                return dest_toc.append(value);
            }
            Ok(_) => {
                tracing::warn!(path = ?value_dir, "Classification name is taken by a file, skipping");
                return Ok(());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir(&value_dir).map_err(|e| medialink_fs::Error::io(&value_dir, e))?;
            }
            Err(e) => return Err(medialink_fs::Error::io(&value_dir, e).into()),
        }
        dest_toc.append(value)?;

        let link = value_dir.join(&item.name);
        let target = relative_path(&item.path, &value_dir);
        place_link(&link, &target)?;

        TocDir::new(&value_dir, self.set.name()).append(&item.name)
    }
}

/// Make `link` a symlink to `target`.
///
/// A symlink with other text is replaced; a non-symlink entry is left alone.
fn place_link(link: &Path, target: &Path) -> Result<()> {
    match fs::symlink_metadata(link) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let current = fs::read_link(link).map_err(|e| medialink_fs::Error::io(link, e))?;
            if current == target {
                return Ok(());
            }
            tracing::debug!(?link, from = ?current, to = ?target, "Retargeting link");
            io::remove_symlink(link)?;
        }
        Ok(_) => {
            tracing::debug!(?link, "Name is taken by a non-link entry, leaving it");
            return Ok(());
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(medialink_fs::Error::io(link, e).into()),
    }
    io::symlink(target, link)?;
    Ok(())
}
