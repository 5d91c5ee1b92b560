//! Configuration management for Gallery Plus.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`, so a missing file or a
//! partial file both produce a usable configuration.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Gallery Plus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library (native backend) settings
    pub library: LibraryConfig,

    /// Listing defaults and enrichment concurrency
    pub listing: ListingConfig,

    /// Thumbnail encoding settings
    pub thumbnail: ThumbnailConfig,

    /// Dominant color sampling
    pub color: ColorConfig,

    /// Subtype detection rules
    pub subtypes: SubtypeConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Temporary file locations
    pub paths: PathsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.galleryplus.gallery-plus/config.toml
    /// - Linux: ~/.config/gallery-plus/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\galleryplus\gallery-plus\config\config.toml
    ///
    /// Falls back to ~/.gallery-plus/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "galleryplus", "gallery-plus")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".gallery-plus").join("config.toml")
            })
    }

    /// Get the resolved library root (with ~ expansion).
    pub fn library_root(&self) -> PathBuf {
        let path_str = self.library.root.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Directory where materialized originals are written.
    ///
    /// Falls back to the system temp directory when unset.
    pub fn temp_dir(&self) -> PathBuf {
        match &self.paths.temp_dir {
            Some(dir) => {
                let path_str = dir.to_string_lossy();
                PathBuf::from(shellexpand::tilde(&path_str).into_owned())
            }
            None => std::env::temp_dir(),
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
