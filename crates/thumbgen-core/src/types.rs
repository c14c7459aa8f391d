//! Core data types shared by the pipeline stages and the traversal.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::log::RunLog;

/// One file on its way to becoming a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailJob {
    /// Image being thumbnailed
    pub source_path: PathBuf,
    /// Output directory the thumbnail lands in
    pub destination_dir: PathBuf,
    /// Collision-free name inside `destination_dir`
    pub output_file_name: String,
}

impl ThumbnailJob {
    /// Full path of the thumbnail.
    pub fn output_path(&self) -> PathBuf {
        self.destination_dir.join(&self.output_file_name)
    }
}

/// Result of running the pipeline on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Thumbnail written to `output`
    Processed { output: PathBuf },
    /// File was not thumbnailed; the reason is in the run log
    Skipped,
}

impl ProcessOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, ProcessOutcome::Processed { .. })
    }
}

/// Counters for one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Thumbnails written
    pub processed: usize,

    /// Files that were not thumbnailed
    pub skipped: usize,

    /// Directories visited, the working directory included
    pub directories: usize,
}

/// How a traversal ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WalkOutcome {
    /// Every reachable entry was visited
    Completed(RunSummary),
    /// Working and output directory are the same; nothing was touched
    Refused,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: WalkOutcome,
    pub log: RunLog,
}

impl RunReport {
    /// Counters of the run; all zero when it was refused.
    pub fn summary(&self) -> RunSummary {
        match &self.outcome {
            WalkOutcome::Completed(summary) => summary.clone(),
            WalkOutcome::Refused => RunSummary::default(),
        }
    }

    pub fn is_refused(&self) -> bool {
        self.outcome == WalkOutcome::Refused
    }
}
