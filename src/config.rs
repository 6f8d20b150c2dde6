//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_STORE_FILE, DEFAULT_UPLOADS_ROOT};

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Root of the `projects/{id}/{version}/...` tree
    pub uploads_root: PathBuf,
    /// Token store file. Defaults to `<uploads_root>/tokens.json`.
    #[serde(default)]
    pub store_file: Option<PathBuf>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            uploads_root: PathBuf::from(DEFAULT_UPLOADS_ROOT),
            store_file: None,
        }
    }
}

impl PathConfig {
    /// Resolved token store location.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.store_file
            .clone()
            .unwrap_or_else(|| self.uploads_root.join(DEFAULT_STORE_FILE))
    }
}

/// Typography classification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypographyConfig {
    /// Breakpoint / device segments accepted as a style's format tag
    #[serde(default = "default_format_tokens")]
    pub format_tokens: Vec<String>,
    /// Also accept numeric breakpoints such as `768` or `1024px`
    #[serde(default = "default_numeric_breakpoints")]
    pub numeric_breakpoints: bool,
}

/// Default format tags.
fn default_format_tokens() -> Vec<String> {
    [
        "mobile",
        "tablet",
        "desktop",
        "landscape",
        "portrait",
        "full",
        "xs",
        "sm",
        "md",
        "lg",
        "xl",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_numeric_breakpoints() -> bool {
    true
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            format_tokens: default_format_tokens(),
            numeric_breakpoints: default_numeric_breakpoints(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/sketch-tokens/config.toml`
/// - macOS: `~/Library/Application Support/sketch-tokens/config.toml`
/// - Windows: `%APPDATA%\sketch-tokens\config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Typography classification
    #[serde(default)]
    pub typography: TypographyConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to `config_path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - `uploads_root` is not empty
    /// - `store_file`, when set, is not empty
    /// - at least one format token is configured, none blank
    pub fn validate(&self) -> Result<()> {
        if self.paths.uploads_root.as_os_str().is_empty() {
            anyhow::bail!("paths.uploads_root must not be empty");
        }

        if let Some(store) = &self.paths.store_file {
            if store.as_os_str().is_empty() {
                anyhow::bail!("paths.store_file must not be empty when set");
            }
        }

        if self.typography.format_tokens.is_empty() {
            anyhow::bail!("typography.format_tokens must list at least one format tag");
        }

        if self.typography.format_tokens.iter().any(|t| t.trim().is_empty()) {
            anyhow::bail!("typography.format_tokens must not contain blank entries");
        }

        Ok(())
    }
}
