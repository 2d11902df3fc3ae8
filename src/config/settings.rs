use anyhow::Result;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "CodeRiskSubmit";
const CONFIG_FILE: &str = "config.json";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "coderisksubmit", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Returns the full path to the configuration file.
pub fn get_config_file_path() -> Option<PathBuf> {
    get_config_directory().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the application configuration from the config file.
///
/// The file is optional and never written; a missing file yields the defaults.
/// A corrupted file logs a warning and also falls back to the defaults, so a
/// bad edit cannot keep the application from starting.
pub fn load_config(path_override: Option<&Path>) -> Result<AppConfig> {
    let config_path = match path_override {
        Some(path) => path.to_path_buf(),
        None => match get_config_file_path() {
            Some(path) => path,
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                return Ok(AppConfig::default());
            }
        },
    };

    if !config_path.exists() {
        tracing::info!(
            "No config file at {:?}, using default configuration",
            config_path
        );
        return Ok(AppConfig::default());
    }

    let config_content = fs::read_to_string(&config_path)?;

    match serde_json::from_str::<AppConfig>(&config_content) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            Ok(AppConfig::default())
        }
    }
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.coderisksubmit.CodeRiskSubmit/
// Linux:   ~/.config/coderisksubmit/
// Windows: %APPDATA%/coderisksubmit/CodeRiskSubmit/config/
