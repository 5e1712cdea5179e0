//! Application settings.
//!
//! Defaults can be overridden by a `settings.json` in the XDG config
//! directory (`~/.config/portprobe` on Linux) or by an explicit file.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the default settings file, if a home directory is known.
pub fn default_settings_file() -> ConfigResult<PathBuf> {
    let project =
        ProjectDirs::from("com", "portprobe", "portprobe").ok_or(ConfigError::DirectoryNotFound)?;
    Ok(project.config_dir().join("settings.json"))
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Port specification used when none is given.
    pub default_ports: String,
    /// Per-probe timeout in seconds.
    pub default_timeout_secs: f64,
    /// Default concurrency level.
    pub default_concurrency: usize,
    /// Enable verbose output by default.
    pub verbose: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_ports: "1-1024".to_string(),
            default_timeout_secs: 0.6,
            default_concurrency: 150,
            verbose: false,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when there is no settings file or no home directory.
    pub fn load() -> ConfigResult<Self> {
        match default_settings_file() {
            Ok(file) if file.exists() => Self::load_from(&file),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }
}
