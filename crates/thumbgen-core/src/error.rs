//! Error types for the thumbnail generation engine.
//!
//! Per-file problems are `PipelineError`s and never escape a traversal.
//! Only directory-level failures surface as `ThumbError::Directory`.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for thumbgen operations.
#[derive(Error, Debug)]
pub enum ThumbError {
    /// A working or output directory could not be created, read or resolved
    #[error("Directory error for {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ThumbError {
    pub(crate) fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Directory {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-file pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// File header is not JPEG, GIF, PNG or BMP, or could not be read
    #[error("Not an image: {0}")]
    NotAnImage(PathBuf),

    /// Header was recognized but the body failed to decode
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Zero-area target or a target too large to allocate
    #[error("Resize failed for {path}: {message}")]
    Resize { path: PathBuf, message: String },

    /// Encoder has no writer for this format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Writing the encoded image failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// Convenience type alias for thumbgen results.
pub type Result<T> = std::result::Result<T, ThumbError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_error_names_path() {
        let err = ThumbError::directory(
            "/photos/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ThumbError::Directory { .. }));
        assert_eq!(err.to_string(), "Directory error for /photos/missing: gone");
        assert!(std::error::Error::source(&err).is_some());
    }
}
