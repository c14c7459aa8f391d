//! Configuration management for thumbgen.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is valid.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::pipeline::{ResizeRatio, WatermarkPlacement};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the output directory used when none is configured.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "thumbs";

/// Root configuration structure for thumbgen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source and destination directories
    pub directories: DirectoriesConfig,

    /// Traversal settings
    pub traversal: TraversalConfig,

    /// Reduction ratio
    pub resize: ResizeConfig,

    /// Watermark settings
    pub watermark: WatermarkConfig,

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
    /// - macOS: ~/Library/Application Support/com.thumbgen.thumbgen/config.toml
    /// - Linux: ~/.config/thumbgen/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\thumbgen\config\config.toml
    ///
    /// Falls back to ~/.thumbgen/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "thumbgen", "thumbgen")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".thumbgen").join("config.toml")
            })
    }

    /// Resolved working directory (with ~ expansion).
    pub fn working_dir(&self) -> PathBuf {
        expand(&self.directories.working_dir)
    }

    /// Resolved output directory (with ~ expansion).
    ///
    /// An empty setting means a `thumbs` directory inside the working directory.
    pub fn output_dir(&self) -> PathBuf {
        if self.directories.output_dir.as_os_str().is_empty() {
            self.working_dir().join(DEFAULT_OUTPUT_DIR_NAME)
        } else {
            expand(&self.directories.output_dir)
        }
    }

    /// Resolved watermark path (with ~ expansion), if one is configured.
    pub fn watermark_path(&self) -> Option<PathBuf> {
        self.watermark.path.as_deref().map(expand)
    }

    /// Directory receiving run log dumps.
    pub fn dump_dir(&self) -> PathBuf {
        self.logging
            .dump_dir
            .as_deref()
            .map(expand)
            .unwrap_or_else(|| self.output_dir())
    }

    /// The reduction ratio, with height defaulting to width.
    pub fn resize_ratio(&self) -> ResizeRatio {
        ResizeRatio::new(self.resize.width_percent, self.resize.height_percent)
    }

    /// Watermark margins as configured.
    pub fn watermark_placement(&self) -> WatermarkPlacement {
        WatermarkPlacement {
            margin_right: self.watermark.margin_right,
            margin_bottom: self.watermark.margin_bottom,
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.traversal.recursive);
        assert_eq!(config.resize.width_percent, 50);
        assert!(config.resize.height_percent.is_none());
        assert!(config.watermark.path.is_none());
        assert!(!config.logging.dump);
    }

    #[test]
    fn test_height_defaults_to_width() {
        let mut config = Config::default();
        config.resize.width_percent = 30;
        let ratio = config.resize_ratio();
        assert_eq!(ratio.width_percent, 30);
        assert_eq!(ratio.height_percent, 30);

        config.resize.height_percent = Some(70);
        assert_eq!(config.resize_ratio().height_percent, 70);
    }

    #[test]
    fn test_default_output_dir_is_inside_working_dir() {
        let mut config = Config::default();
        config.directories.working_dir = PathBuf::from("/photos");
        assert_eq!(config.output_dir(), PathBuf::from("/photos/thumbs"));

        config.directories.output_dir = PathBuf::from("/elsewhere");
        assert_eq!(config.output_dir(), PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_dump_dir_defaults_to_output_dir() {
        let mut config = Config::default();
        config.directories.output_dir = PathBuf::from("/out");
        assert_eq!(config.dump_dir(), PathBuf::from("/out"));

        config.logging.dump_dir = Some(PathBuf::from("/logs"));
        assert_eq!(config.dump_dir(), PathBuf::from("/logs"));
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[directories]"));
        assert!(toml.contains("[resize]"));
        assert!(toml.contains("width_percent = 50"));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[resize]\nwidth_percent = 25\n\n[traversal]\nrecursive = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.resize.width_percent, 25);
        assert!(!config.traversal.recursive);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[resize]\nwidth_percent = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("width_percent"));
    }
}
