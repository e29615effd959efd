//! [`TestSet`] builder for organizing scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use medialink_meta::{OutputGroup, ScanMode, SetConfig};
use medialink_resolvers::ResolverRegistry;
use tempfile::TempDir;

use crate::resolver::MemoryResolver;

/// A temporary layout for one Set:
///
/// ```text
/// <tmp>/All/       source items
/// <tmp>/Actors/    output destination, grouped by `actors`
/// <tmp>/.cache/    cache directory
/// ```
///
/// The Set is called `test`, scans directories and uses one
/// [`MemoryResolver`] registered as `dummy`.
pub struct TestSet {
    temp_dir: TempDir,
    pub config: SetConfig,
    pub resolver: MemoryResolver,
}

impl Default for TestSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSet {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for dir in ["All", "Actors", ".cache"] {
            fs::create_dir(root.join(dir)).unwrap();
        }

        let mut config = SetConfig::new("test", root.join("All"));
        config.scan_mode = ScanMode::Directories;
        config.resolvers = vec!["dummy".to_string()];
        config.cache_dir = Some(root.join(".cache"));
        config.output = vec![OutputGroup::new(root.join("Actors"), "actors")];

        Self {
            temp_dir,
            config,
            resolver: MemoryResolver::new("dummy"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.root().join("All")
    }

    pub fn dest(&self) -> PathBuf {
        self.root().join("Actors")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root().join(".cache")
    }

    /// Create a directory item in the source collection.
    pub fn add_item(&self, name: &str) -> PathBuf {
        let path = self.source().join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Create a file item in the source collection.
    pub fn add_file(&self, name: &str) -> PathBuf {
        let path = self.source().join(name);
        fs::write(&path, name).unwrap();
        path
    }

    /// Built-in resolvers plus this Set's [`MemoryResolver`].
    pub fn registry(&self) -> ResolverRegistry {
        let mut registry = ResolverRegistry::with_builtins();
        registry.register(self.resolver.clone().into_arc());
        registry
    }

    /// Target text of the symlink at `rel` under the root, if it is one.
    pub fn link_target(&self, rel: &str) -> Option<PathBuf> {
        fs::read_link(self.root().join(rel)).ok()
    }

    /// Sorted names inside `rel`, manifests included.
    pub fn list(&self, rel: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root().join(rel))
            .unwrap_or_else(|e| panic!("Could not list {rel}: {e}"))
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Sorted names inside `rel`, manifests excluded.
    pub fn entries(&self, rel: &str) -> Vec<String> {
        self.list(rel)
            .into_iter()
            .filter(|name| !name.starts_with(".toc"))
            .collect()
    }

    /// Assert that `rel` is a symlink resolving to the source item `item`.
    ///
    /// # Panics
    /// Panics with a descriptive message otherwise.
    pub fn assert_linked(&self, rel: &str, item: &str) {
        let link = self.root().join(rel);
        let target = self
            .link_target(rel)
            .unwrap_or_else(|| panic!("Expected a symlink at {}", link.display()));
        let resolved = link.parent().unwrap().join(&target);
        assert_eq!(
            fs::canonicalize(&resolved).unwrap(),
            fs::canonicalize(self.source().join(item)).unwrap(),
            "Link {} points to {}",
            link.display(),
            target.display()
        );
    }

    /// Assert that nothing exists at `rel`, not even a dangling symlink.
    ///
    /// # Panics
    /// Panics with a descriptive message if an entry exists.
    pub fn assert_absent(&self, rel: &str) {
        let path = self.root().join(rel);
        assert!(
            fs::symlink_metadata(&path).is_err(),
            "Expected nothing at {}",
            path.display()
        );
    }
}
