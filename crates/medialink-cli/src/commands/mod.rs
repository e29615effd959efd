//! Command implementations for medialink-cli

pub mod list;
pub mod organize;

pub use list::{run_list_resolvers, run_list_sets};
pub use organize::run_organize;

use std::path::{Path, PathBuf};

use medialink_meta::ConfigFile;

use crate::error::{CliError, Result};

/// Default config location under the platform config directory.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("medialink").join("config.toml"))
}

/// Find the config file: the explicit path (`--config` or
/// `MEDIALINK_CONFIG`), else the platform default.
pub fn locate_config(explicit: Option<&Path>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_config_path().ok_or_else(|| {
            CliError::user("No config file given and no platform config directory found")
        })?,
    };
    if !path.is_file() {
        return Err(CliError::user(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    Ok(path)
}

pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = locate_config(explicit)?;
    tracing::debug!(?path, "Using config");
    Ok(ConfigFile::load(&path)?)
}
