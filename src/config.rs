//! Configuration file parsing for appmenu.
//!
//! Reads configuration from `~/.appmenu/config.toml` and provides defaults
//! for missing fields.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Main configuration struct for appmenu.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory containing per-platform menu definitions, overriding the
    /// embedded ones.
    pub menus_dir: Option<PathBuf>,
    /// Where the `update-application-menu` message is written for the
    /// rendering process. Defaults to `~/.appmenu/menu.json`.
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `~/.appmenu/config.toml`.
    ///
    /// - If the file doesn't exist, returns default configuration.
    /// - If the file contains invalid TOML, logs a warning and returns default.
    /// - If some fields are missing, uses defaults for those fields.
    pub fn load() -> Config {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => {
                warn!("could not determine home directory, using default config");
                return Config::default();
            }
        };

        if !config_path.exists() {
            return Config::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                warn!(
                    "invalid TOML in {}: {}, using default config",
                    config_path.display(),
                    e
                );
                Config::default()
            }),
            Err(e) => {
                warn!(
                    "could not read {}: {}, using default config",
                    config_path.display(),
                    e
                );
                Config::default()
            }
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// Missing fields will use their default values due to `#[serde(default)]`.
    pub fn from_toml(toml_str: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml_str)?;
        Ok(config)
    }

    /// Returns the path to the config file: `~/.appmenu/config.toml`
    fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".appmenu").join("config.toml"))
    }

    /// Returns the path the menu snapshot is written to.
    ///
    /// Respects the `APPMENU_SNAPSHOT` env var override for test isolation,
    /// then the configured `snapshot_path`, then `~/.appmenu/menu.json`.
    pub fn snapshot_path(&self) -> PathBuf {
        if let Ok(path) = std::env::var("APPMENU_SNAPSHOT") {
            return PathBuf::from(path);
        }
        match &self.snapshot_path {
            Some(path) => path.clone(),
            None => dirs::home_dir()
                .expect("Could not determine home directory")
                .join(".appmenu")
                .join("menu.json"),
        }
    }
}
