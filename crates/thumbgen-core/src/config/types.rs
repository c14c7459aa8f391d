//! Configuration section structs with defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Working and output directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoriesConfig {
    /// Directory scanned for source images
    pub working_dir: PathBuf,

    /// Directory receiving thumbnails; empty means `<working_dir>/thumbs`
    pub output_dir: PathBuf,
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            output_dir: PathBuf::new(),
        }
    }
}

/// Traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Descend into subdirectories, mirroring them under the output directory
    pub recursive: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self { recursive: true }
    }
}

/// Reduction ratio settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Thumbnail width as a percentage of the source width
    pub width_percent: u32,

    /// Thumbnail height as a percentage of the source height.
    /// Falls back to `width_percent` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_percent: Option<u32>,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            width_percent: 50,
            height_percent: None,
        }
    }
}

/// Watermark settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Image stamped onto every thumbnail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Offset subtracted from the right edge; centered when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<i64>,

    /// Offset subtracted from the bottom edge; centered when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<i64>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,

    /// Write the run log to a timestamped file after each run
    pub dump: bool,

    /// Directory for run log dumps; defaults to the output directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            dump: false,
            dump_dir: None,
        }
    }
}
