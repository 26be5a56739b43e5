//! # Configuration File Loading
//!
//! Loads configuration from TOML files.

use crate::config::Config;
use errors::ConfigError;
use std::path::Path;

/// Load configuration from a TOML file.
///
/// Missing fields fall back to their defaults; unknown fields are
/// ignored. The returned configuration is not validated here. Callers
/// run [`crate::validate`] after layering environment overrides.
pub fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        format: "TOML".to_string(),
        reason: e.to_string(),
    })?;

    Ok(config)
}
