// Configuration management for gist-manager.
//
// Configuration is loaded from `~/.config/gist-manager/config.toml`.
// Every field has a default, so a missing file is not an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Gist API connection settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Where and how opened gist files are shown.
    #[serde(default)]
    pub documents: DocumentConfig,
}

/// Settings for the HTTP client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL (default: https://api.github.com). Point this at
    /// `https://<host>/api/v3` for GitHub Enterprise.
    #[serde(default = "default_api_base")]
    pub base_url: String,
    /// Value of the `X-GitHub-Api-Version` header.
    #[serde(default = "default_api_version")]
    pub version: String,
    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout. Unset means the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            version: default_api_version(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

/// Settings for the terminal document surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Directory for opened gist files (default: system temp dir).
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    /// Editor command. Falls back to $VISUAL, then $EDITOR.
    #[serde(default)]
    pub editor: Option<String>,
    /// Launch the editor after opening a gist file.
    #[serde(default = "default_true")]
    pub open_in_editor: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            scratch_dir: None,
            editor: None,
            open_in_editor: true,
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_user_agent() -> String {
    format!("gist-manager/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("gist-manager"))
            .context("Could not determine config directory")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, using defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Directory used for opened gist files.
    pub fn scratch_dir(&self) -> PathBuf {
        self.documents
            .scratch_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("gist-manager"))
    }

    /// Editor command from config or environment.
    pub fn editor_command(&self) -> Option<String> {
        self.documents
            .editor
            .clone()
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .filter(|e| !e.trim().is_empty())
    }
}
