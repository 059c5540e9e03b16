//! Configuration for triage
//!
//! Stored per user in `<config dir>/triage/config.toml`.

use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "triage";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// triage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracker API token
    pub token: String,

    /// Login to display alongside the token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Tracker API base URL (GitHub Enterprise installs differ)
    pub api_url: String,

    /// Display settings
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            user_name: None,
            api_url: DEFAULT_API_URL.to_string(),
            display: DisplayConfig::default(),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use colors in output
    pub colors: bool,

    /// Date format for display
    pub date_format: String,

    /// Maximum title length in plain-text listings
    pub max_title_length: usize,

    /// Open the full-screen view for listings by default
    pub screen: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            date_format: "%Y-%m-%d %H:%M".to_string(),
            max_title_length: 50,
            screen: false,
        }
    }
}

impl Config {
    /// Default config location for the current user
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("no config directory for this user".to_string()))?;
        Ok(dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load config from a TOML file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        check_date_format(&config.display.date_format)?;
        Ok(config)
    }

    /// Save config to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// Reject strftime strings chrono cannot render
pub fn check_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::Config(format!("invalid date_format '{}'", format)));
    }
    Ok(())
}
