//! Configuration file loading.
//!
//! Reads the optional TOML configuration file.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError, Result};

/// Load configuration from an explicit path, or from the default location
/// when it exists.
///
/// # Errors
/// Returns error if an explicit file is missing, or if a file exists but
/// cannot be read or parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(AppError::Config {
                message: format!("Config file not found: {}", path.display()),
            });
        }
        return load_config_from_file(path);
    }

    match AppConfig::default_config_path() {
        Some(path) if path.is_file() => load_config_from_file(&path),
        _ => Ok(AppConfig::default()),
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    let config = toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })?;

    tracing::info!(path = %path.display(), "Configuration loaded");

    Ok(config)
}
