//! Configuration management for Portal.
//!
//! Loads configuration from ${PORTAL_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for Portal configuration and data directories.
    //!
    //! PORTAL_HOME resolution order:
    //! 1. PORTAL_HOME environment variable (if set)
    //! 2. ~/.config/portal (default)

    use std::path::PathBuf;

    /// Returns the Portal home directory.
    ///
    /// Checks PORTAL_HOME env var first, falls back to ~/.config/portal.
    /// Without a resolvable home directory the current directory is used.
    pub fn portal_home() -> PathBuf {
        if let Ok(home) = std::env::var("PORTAL_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".portal"),
            |h| h.join(".config").join("portal"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        portal_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        portal_home().join("session.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        portal_home().join("logs")
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Portal configuration

# Base URL of the school API. PORTAL_BASE_URL overrides this value.
# base_url = "https://aapsuj.accevate.co/flutter-api"

# Log filter for ${PORTAL_HOME}/logs/portal.log. PORTAL_LOG overrides this value.
log_level = "info"
"#;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API base URL override.
    pub base_url: Option<String>,

    /// Default tracing filter directive.
    pub log_level: String,
}

impl Config {
    pub const DEFAULT_LOG_LEVEL: &'static str = "info";

    /// Loads configuration from the default path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
