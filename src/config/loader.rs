// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, ConfigOverrides, RawConfigFile};
use crate::errors::{RebakeError, Result};
use crate::fs::FileSystem;

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    let contents = fs
        .read_to_string(path)
        .map_err(|e| RebakeError::Config(format!("cannot read {}: {e:#}", path.display())))?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load an explicitly requested config file, or the default one if it
/// exists, or fall back to built-in defaults.
///
/// An explicit path that cannot be read is an error; a missing default file
/// is not.
pub fn load_or_default(fs: &dyn FileSystem, path: Option<&Path>) -> Result<RawConfigFile> {
    match path {
        Some(path) => load_from_path(fs, path),
        None => {
            let path = default_config_path();
            if fs.exists(&path) {
                load_from_path(fs, &path)
            } else {
                debug!(path = %path.display(), "no config file; using defaults");
                Ok(RawConfigFile::default())
            }
        }
    }
}

/// Load configuration, apply command-line overrides, and validate.
///
/// This is the entry point for the rest of the application.
pub fn load_and_validate(
    fs: &dyn FileSystem,
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ConfigFile> {
    let mut raw = load_or_default(fs, path)?;
    raw.apply_overrides(overrides);
    ConfigFile::try_from(raw)
}

/// `Rebake.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Rebake.toml")
}
