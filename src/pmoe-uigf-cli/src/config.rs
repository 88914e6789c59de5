//! Configuration management for pmoe-uigf CLI

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pmoe_uigf::dictionary::{DEFAULT_CACHE_TTL, DEFAULT_TIMEOUT, DEFAULT_WORDS_URL};
use pmoe_uigf::overrides::DEFAULT_OVERRIDE_FILE;
use pmoe_uigf::uigf::{DEFAULT_EXPORT_APP, DEFAULT_EXPORT_APP_VERSION};

const APP_DIR: &str = "pmoe-uigf";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub export_app: Option<String>,
    pub export_app_version: Option<String>,
    pub override_file: Option<PathBuf>,
    pub dictionary_url: Option<String>,
    pub dictionary_cache_ttl_hours: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }

    /// Where the downloaded word list is cached
    pub fn cache_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .context("Could not determine cache directory")?
            .join(APP_DIR);

        Ok(cache_dir.join("words.json"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    pub fn export_app(&self) -> &str {
        self.export_app.as_deref().unwrap_or(DEFAULT_EXPORT_APP)
    }

    pub fn export_app_version(&self) -> &str {
        self.export_app_version
            .as_deref()
            .unwrap_or(DEFAULT_EXPORT_APP_VERSION)
    }

    /// Configured store, else `rank-override.json` in the working directory
    pub fn override_file(&self) -> PathBuf {
        self.override_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OVERRIDE_FILE))
    }

    pub fn dictionary_url(&self) -> &str {
        self.dictionary_url.as_deref().unwrap_or(DEFAULT_WORDS_URL)
    }

    pub fn cache_ttl(&self) -> Duration {
        self.dictionary_cache_ttl_hours
            .map(|h| Duration::from_secs(h * 3600))
            .unwrap_or(DEFAULT_CACHE_TTL)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}
