//! Metadata derived from the item name itself

use std::path::Path;
use std::sync::LazyLock;

use medialink_meta::Metadata;
use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::resolver::Resolver;

/// Matches `(1999)` or `(1999-2004)`.
static YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([12][0-9]{3})(?:-[12][0-9]{3})?\)").expect("year pattern is valid")
});

/// Produces `title` and, when present, `year` from names like
/// `Some Film (1999).mkv`.
#[derive(Debug, Default)]
pub struct FilenameResolver;

impl FilenameResolver {
    pub fn new() -> Self {
        Self
    }

    /// Split a name into its title and optional year.
    pub fn parse(name: &str, is_file: bool) -> (String, Option<String>) {
        let base = if is_file {
            Path::new(name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.to_string())
        } else {
            name.to_string()
        };

        let year = YEAR
            .captures(&base)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        let title = YEAR.replace_all(&base, "");
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        (title, year)
    }
}

impl Resolver for FilenameResolver {
    fn id(&self) -> &str {
        "filename"
    }

    fn get_metadata(&self, item: &Metadata, _options: &Value) -> Result<Option<Metadata>> {
        let Some(name) = item.name() else {
            return Ok(None);
        };
        let is_file = item.path().is_some_and(|p| Path::new(p).is_file());
        let (title, year) = Self::parse(name, is_file);

        let mut metadata = Metadata::new();
        metadata.insert("title", Value::String(title));
        if let Some(year) = year {
            metadata.insert("year", Value::String(year));
        }
        Ok(Some(metadata))
    }
}
