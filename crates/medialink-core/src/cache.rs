//! Per-item metadata cache
//!
//! One JSON record per item, named `.cache-<sha256(name)>`, holding the
//! metadata fields plus the resolver-options fingerprint they were produced
//! under. A record is only reused when its fingerprint equals the current
//! one; any read or parse failure is a cache miss.

use std::path::{Path, PathBuf};

use medialink_fs::{CacheFile, checksum, io};
use medialink_meta::Metadata;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::scan::Item;

/// Serialized field holding the fingerprint.
const FINGERPRINT_FIELD: &str = "resolver_options";

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    #[serde(rename = "resolver_options", default)]
    fingerprint: Option<String>,
    #[serde(flatten)]
    metadata: Metadata,
}

/// Cache of resolved metadata for one Set.
#[derive(Debug, Clone)]
pub struct MetadataCache {
    dir: PathBuf,
    fingerprint: String,
}

impl MetadataCache {
    pub fn new(dir: impl Into<PathBuf>, fingerprint: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            fingerprint: fingerprint.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the record for `name`.
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!(
            "{}{}",
            CacheFile::RECORD_PREFIX,
            checksum::content_key(name)
        ))
    }

    /// Load the cached metadata for `name`, if usable.
    ///
    /// Returns `None` for a missing record, a record written under different
    /// resolver options, or a record that cannot be read or parsed (the last
    /// case is logged).
    pub fn load(&self, name: &str) -> Option<Metadata> {
        let path = self.record_path(name);
        let content = match io::read_text(&path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => return None,
            Err(e) => {
                tracing::warn!(item = name, ?path, error = %e, "Failed to open cache file");
                return None;
            }
        };

        let record: CacheRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(item = name, ?path, error = %e, "Failed to parse cache file");
                return None;
            }
        };

        if record.fingerprint.as_deref() != Some(self.fingerprint.as_str()) {
            tracing::debug!(item = name, "Cached data was produced with other resolver options");
            return None;
        }
        Some(record.metadata)
    }

    /// Store `metadata` as the record for `item` together with the current
    /// fingerprint.
    ///
    /// The record's `name` and `path` always come from `item`, whatever a
    /// resolver wrote into those fields.
    pub fn save(&self, item: &Item, metadata: &Metadata) -> Result<()> {
        let mut metadata = metadata.clone();
        metadata.remove(FINGERPRINT_FIELD);
        metadata.overlay(Metadata::for_item(&item.name, &item.path));
        let record = CacheRecord {
            fingerprint: Some(self.fingerprint.clone()),
            metadata,
        };
        let content = serde_json::to_vec(&record)?;
        io::write_atomic(&self.record_path(&item.name), &content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn item(name: &str) -> Item {
        Item {
            name: name.into(),
            path: Path::new("/src").join(name),
        }
    }

    fn sample(name: &str) -> Metadata {
        let mut m = Metadata::for_item(name, Path::new("/src").join(name).as_path());
        m.insert("actors", json!(["Sir George"]));
        m
    }

    #[test]
    fn save_then_load_with_same_fingerprint() {
        let dir = tempdir().unwrap();
        let cache = MetadataCache::new(dir.path(), "{}");

        cache.save(&item("test"), &sample("test")).unwrap();
        let loaded = cache.load("test").unwrap();

        assert_eq!(loaded, sample("test"));
    }

    #[test]
    fn fingerprint_mismatch_is_a_miss() {
        let dir = tempdir().unwrap();
        MetadataCache::new(dir.path(), "{}").save(&item("test"), &sample("test")).unwrap();

        let other = MetadataCache::new(dir.path(), r#"{"table":{"file":"x"}}"#);
        assert!(other.load("test").is_none());
    }

    #[test]
    fn record_without_fingerprint_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = MetadataCache::new(dir.path(), "{}");
        std::fs::write(cache.record_path("test"), r#"{"name":"test"}"#).unwrap();

        assert!(cache.load("test").is_none());
    }

    #[test]
    fn corrupt_record_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = MetadataCache::new(dir.path(), "{}");
        std::fs::write(cache.record_path("test"), "{truncated").unwrap();

        assert!(cache.load("test").is_none());
    }

    #[test]
    fn record_is_keyed_by_item_not_name_field() {
        let dir = tempdir().unwrap();
        let cache = MetadataCache::new(dir.path(), "{}");
        let mut metadata = sample("test");
        metadata.insert("name", json!("Proper Title"));

        cache.save(&item("test"), &metadata).unwrap();

        assert!(cache.load("Proper Title").is_none());
        assert_eq!(cache.load("test").unwrap(), sample("test"));
    }

    #[test]
    fn record_names_are_hashed() {
        let cache = MetadataCache::new("/c", "{}");
        let path = cache.record_path("a/b name");
        let file = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file.starts_with(".cache-"));
        assert_eq!(file.len(), ".cache-".len() + 64);
    }

    #[test]
    fn stored_record_carries_fingerprint_field() {
        let dir = tempdir().unwrap();
        let cache = MetadataCache::new(dir.path(), "{}");
        cache.save(&item("test"), &sample("test")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(cache.record_path("test")).unwrap())
                .unwrap();
        assert_eq!(raw["resolver_options"], "{}");
        assert_eq!(raw["name"], "test");
    }
}
