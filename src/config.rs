//! Configuration handling for gitt
//!
//! Configuration is read from `<repo root>/.gitt.toml` (repository) and
//! `~/.config/gitt/config.toml` (global). Both files are optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::output::OutputFormat;

/// File name of the per-repository configuration
pub const REPO_CONFIG_FILE: &str = ".gitt.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Repository-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepoConfig {
    /// Name of the main branch, skipping auto-detection
    pub main_branch: Option<String>,

    /// Default case sensitivity for keyword/regex filters
    pub case_sensitive: bool,

    /// Ask before deleting filtered branches
    pub confirm_delete: bool,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            main_branch: None,
            case_sensitive: false,
            confirm_delete: true,
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Verbose logging unless overridden on the command line
    pub verbose: bool,
}

/// Combined configuration (global + repository)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub repo: RepoConfig,
    pub global: GlobalConfig,
}

impl Config {
    /// Loads configuration for a specific repository
    pub fn for_repo(repo_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let repo = Self::load_repo_config(repo_root)?;

        Ok(Self { repo, global })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "gitt", "gitt").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        Self::parse_global(&content)
            .with_context(|| format!("Failed to parse global config: {}", config_path.display()))
    }

    /// Loads repository configuration from a specific root
    pub fn load_repo_config(repo_root: &Path) -> Result<RepoConfig> {
        let config_path = repo_root.join(REPO_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(RepoConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read repository config: {}", config_path.display()))?;

        Self::parse_repo(&content)
            .with_context(|| format!("Failed to parse repository config: {}", config_path.display()))
    }

    fn parse_global(content: &str) -> Result<GlobalConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn parse_repo(content: &str) -> Result<RepoConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
