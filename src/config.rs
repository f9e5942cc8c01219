//! Application configuration management.
//!
//! Configuration lives in the user's config directory (typically
//! ~/.config/cuesync/config.toml). It can pin the catalog and memo locations,
//! choose which file extensions count as songs and describe the shared
//! catalog repository. Everything is optional; a missing file means defaults.

use crate::constants::{
    CATALOG_FILE_NAME, DEFAULT_BRANCH, DEFAULT_REMOTE, MEDIA_EXTENSIONS, MEMO_FILE_NAME,
};
use crate::location::{Platform, default_catalog_path};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Overrides the platform default catalog location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo_path: Option<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_shared_remote")]
    pub shared_remote: String,
    #[serde(default = "default_shared_branch")]
    pub shared_branch: String,
    #[serde(default = "default_shared_file")]
    pub shared_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

fn default_extensions() -> Vec<String> {
    MEDIA_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_shared_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

fn default_shared_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_shared_file() -> String {
    CATALOG_FILE_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            catalog_path: None,
            memo_path: None,
            extensions: default_extensions(),
            shared_remote: default_shared_remote(),
            shared_branch: default_shared_branch(),
            shared_file: default_shared_file(),
            log_file: None,
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("cuesync")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("cuesync")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());
        match key {
            "catalog_path" => self.catalog_path = optional(value),
            "memo_path" => self.memo_path = optional(value),
            "log_file" => self.log_file = optional(value),
            "extensions" => {
                let extensions: Vec<String> = value
                    .split(',')
                    .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect();
                if extensions.is_empty() {
                    return Err("extensions needs at least one entry, e.g. mp3,flac".into());
                }
                self.extensions = extensions;
            }
            "shared_remote" | "shared_branch" | "shared_file" if value.is_empty() => {
                return Err(format!("{key} cannot be empty").into());
            }
            "shared_remote" => self.shared_remote = value.to_string(),
            "shared_branch" => self.shared_branch = value.to_string(),
            "shared_file" => self.shared_file = value.to_string(),
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }

    /// Catalog for music under `root`: the configured path, or VirtualDJ's
    /// default location on `platform`.
    pub fn resolve_catalog_path(
        &self,
        root: &Path,
        platform: Platform,
    ) -> Result<PathBuf, Box<dyn Error>> {
        match &self.catalog_path {
            Some(path) => Ok(expand(path)),
            None => Ok(default_catalog_path(
                platform,
                root,
                dirs::home_dir().as_deref(),
            )?),
        }
    }

    pub fn resolve_memo_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        match &self.memo_path {
            Some(path) => Ok(expand(path)),
            None => Ok(Self::config_dir()?.join(MEMO_FILE_NAME)),
        }
    }

    pub fn resolve_log_file(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(expand)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
