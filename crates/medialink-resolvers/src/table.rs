//! Metadata looked up in a user-maintained table file

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use medialink_fs::ConfigStore;
use medialink_meta::Metadata;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::resolver::Resolver;

/// Reads a TOML, JSON or YAML table keyed by item name.
///
/// Options: `{ file = "<path>" }`. Items missing from the table resolve to
/// "no result". Loaded tables are kept for the lifetime of the instance.
#[derive(Debug, Default)]
pub struct TableResolver {
    tables: Mutex<HashMap<PathBuf, Arc<Map<String, Value>>>>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, path: &Path) -> Result<Arc<Map<String, Value>>> {
        let mut tables = match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(table) = tables.get(path) {
            return Ok(Arc::clone(table));
        }

        let value: Value = ConfigStore::new().load(path)?;
        let Value::Object(map) = value else {
            return Err(Error::InvalidTable {
                path: path.to_path_buf(),
                message: "top level must be a mapping of item names".into(),
            });
        };
        let table = Arc::new(map);
        tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }
}

impl Resolver for TableResolver {
    fn id(&self) -> &str {
        "table"
    }

    fn get_metadata(&self, item: &Metadata, options: &Value) -> Result<Option<Metadata>> {
        let file = options
            .get("file")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingOption {
                resolver: self.id().to_string(),
                option: "file".into(),
            })?;
        let Some(name) = item.name() else {
            return Ok(None);
        };

        let table = self.table(Path::new(file))?;
        match table.get(name) {
            None => Ok(None),
            Some(Value::Object(fields)) => Ok(Some(Metadata::from(fields.clone()))),
            Some(_) => Err(Error::InvalidTable {
                path: PathBuf::from(file),
                message: format!("entry for {} is not a mapping", name),
            }),
        }
    }
}
