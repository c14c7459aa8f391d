//! thumbgen core - embeddable thumbnail generation engine.
//!
//! Walks a working directory, and for every JPEG, GIF, PNG or BMP file writes
//! a scaled copy into a mirrored output tree, rotated to match its EXIF
//! orientation and optionally stamped with a watermark.
//!
//! # Architecture
//!
//! ```text
//! Walker → Decode → Resize → Rotate → Encode → Watermark
//!                      ↑ output name from CollisionResolver
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use thumbgen_core::{ResizeRatio, ThumbGenerator};
//!
//! fn main() -> thumbgen_core::Result<()> {
//!     let report = ThumbGenerator::new("./photos", "./photos/thumbs")
//!         .with_resize_ratio(ResizeRatio::new(25, None))
//!         .run()?;
//!     for line in report.log.lines() {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod log;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult, Result, ThumbError};
pub use log::{LogEvent, RunLog};
pub use pipeline::{ResizeRatio, ThumbnailPipeline, Watermark, WatermarkPlacement};
pub use types::{ProcessOutcome, RunReport, RunSummary, ThumbnailJob, WalkOutcome};

use std::path::{Path, PathBuf};

use crate::pipeline::DirectoryWalker;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Thumbnail generator - the main entry point.
///
/// Holds the settings for a run and the watermark, which is decoded once
/// when configured and reused for every file.
pub struct ThumbGenerator {
    working_dir: PathBuf,
    output_dir: PathBuf,
    recursive: bool,
    pipeline: ThumbnailPipeline,
}

impl ThumbGenerator {
    /// Create a generator with default settings: recursive, 50% x 50%, no watermark.
    pub fn new(working_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            output_dir: output_dir.into(),
            recursive: true,
            pipeline: ThumbnailPipeline::default(),
        }
    }

    /// Create a generator from configuration, loading the watermark if one is set.
    pub fn from_config(config: &Config) -> Self {
        let generator = Self::new(config.working_dir(), config.output_dir())
            .recursive(config.traversal.recursive)
            .with_resize_ratio(config.resize_ratio());

        match config.watermark_path() {
            Some(path) => generator.with_watermark(&path, config.watermark_placement()),
            None => generator,
        }
    }

    /// Enable or disable descending into subdirectories.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the reduction ratio.
    pub fn with_resize_ratio(mut self, ratio: ResizeRatio) -> Self {
        self.pipeline = self.pipeline.with_ratio(ratio);
        self
    }

    /// Load the watermark at `path`.
    ///
    /// A watermark that cannot be loaded is reported and left out; the run
    /// itself is unaffected.
    pub fn with_watermark(mut self, path: &Path, placement: WatermarkPlacement) -> Self {
        match Watermark::load(path) {
            Ok(watermark) => self.pipeline = self.pipeline.with_watermark(watermark, placement),
            Err(e) => tracing::warn!("Watermark disabled: {}", e),
        }
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn pipeline(&self) -> &ThumbnailPipeline {
        &self.pipeline
    }

    /// Create the working and output directories if they do not exist yet.
    pub fn prepare_directories(&self) -> Result<()> {
        for dir in [&self.working_dir, &self.output_dir] {
            std::fs::create_dir_all(dir).map_err(|e| ThumbError::directory(dir, e))?;
        }
        Ok(())
    }

    /// Run one traversal.
    ///
    /// Only directory problems are errors; per-file problems end up in the
    /// report's log.
    pub fn run(&self) -> Result<RunReport> {
        tracing::debug!("thumbgen v{}", VERSION);
        self.prepare_directories()?;

        let mut log = RunLog::new();
        let outcome = DirectoryWalker::new(&self.pipeline, self.recursive).walk(
            &self.working_dir,
            &self.output_dir,
            &mut log,
        )?;

        Ok(RunReport { outcome, log })
    }
}
