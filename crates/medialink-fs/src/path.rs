//! Lexical path handling
//!
//! Symlink targets are computed without touching the filesystem, so the
//! same inputs always yield the same link text. Comparisons of configured
//! directories go through [`same_path`], which canonicalizes when it can,
//! and of directory entries through [`same_entry`], which never follows
//! the entry itself.

use std::path::{Component, Path, PathBuf};

/// Full-width solidus substituted for `/` inside classification values.
pub const FULLWIDTH_SOLIDUS: char = '\u{FF0F}';

/// Make a path absolute and resolve `.` and `..` segments lexically.
///
/// Relative inputs are anchored at the current working directory. Symlinks
/// are not followed.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Compute the path of `target` relative to the directory `base`.
///
/// Both paths are normalized first. The result is suitable as the text of
/// a symlink placed inside `base`.
pub fn relative_path(target: impl AsRef<Path>, base: impl AsRef<Path>) -> PathBuf {
    let target = normalize(target);
    let base = normalize(base);

    let target_parts: Vec<_> = target.components().collect();
    let base_parts: Vec<_> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    rel
}

/// Compare two paths for identity.
///
/// Uses canonical paths when both exist, falling back to lexical
/// normalization otherwise.
pub fn same_path(a: impl AsRef<Path>, b: impl AsRef<Path>) -> bool {
    let (a, b) = (a.as_ref(), b.as_ref());
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => normalize(a) == normalize(b),
    }
}

/// Compare two directory entries for identity without following them.
///
/// Only the parent directories are canonicalized, so a symlink is never
/// confused with its target.
pub fn same_entry(a: impl AsRef<Path>, b: impl AsRef<Path>) -> bool {
    entry_path(a.as_ref()) == entry_path(b.as_ref())
}

fn entry_path(path: &Path) -> PathBuf {
    let path = normalize(path);
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => dunce::canonicalize(parent)
            .map(|parent| parent.join(name))
            .unwrap_or(path),
        _ => path,
    }
}

/// Replace path separators inside a single name component.
///
/// A metadata value such as `AC/DC` must become one directory, not two.
pub fn escape_separators(value: &str) -> String {
    value.replace('/', &FULLWIDTH_SOLIDUS.to_string())
}
