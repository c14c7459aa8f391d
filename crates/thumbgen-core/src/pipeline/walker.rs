//! Depth-first traversal of the working directory.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, ThumbError};
use crate::log::RunLog;
use crate::types::{ProcessOutcome, RunSummary, WalkOutcome};

use super::collision::CollisionResolver;
use super::processor::ThumbnailPipeline;

/// The directory pair one level of the traversal works on.
///
/// Recursion builds a new context for the child instead of mutating the
/// parent's, so siblings visited afterwards still see the parent pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalContext {
    /// Directory being scanned
    pub working_dir: PathBuf,
    /// Directory its thumbnails are written to
    pub output_dir: PathBuf,
}

impl TraversalContext {
    /// Context for the subdirectory `name`, mirrored under the output directory.
    pub fn child(&self, name: &OsStr) -> Self {
        Self {
            working_dir: self.working_dir.join(name),
            output_dir: self.output_dir.join(name),
        }
    }
}

/// Walks a working directory and feeds every file to the pipeline.
pub struct DirectoryWalker<'a> {
    pipeline: &'a ThumbnailPipeline,
    recursive: bool,
}

impl<'a> DirectoryWalker<'a> {
    /// Create a walker feeding `pipeline`, descending into subdirectories when `recursive`.
    pub fn new(pipeline: &'a ThumbnailPipeline, recursive: bool) -> Self {
        Self {
            pipeline,
            recursive,
        }
    }

    /// Thumbnail everything under `working_dir` into `output_dir`.
    ///
    /// Refuses to do anything when both resolve to the same directory.
    pub fn walk(&self, working_dir: &Path, output_dir: &Path, log: &mut RunLog) -> Result<WalkOutcome> {
        std::fs::create_dir_all(output_dir).map_err(|e| ThumbError::directory(output_dir, e))?;
        let working_dir = working_dir
            .canonicalize()
            .map_err(|e| ThumbError::directory(working_dir, e))?;
        let output_dir = output_dir
            .canonicalize()
            .map_err(|e| ThumbError::directory(output_dir, e))?;

        if working_dir == output_dir {
            tracing::warn!(
                "Working and output directory are both {:?}, nothing to do",
                working_dir
            );
            return Ok(WalkOutcome::Refused);
        }

        let root = TraversalContext {
            working_dir,
            output_dir,
        };
        let mut summary = RunSummary::default();
        let mut visited = HashSet::from([root.working_dir.clone()]);
        self.visit(&root, &root.output_dir, &mut visited, &mut summary, log)?;

        tracing::info!(
            "Processed {} file(s), skipped {}, in {} director{}",
            summary.processed,
            summary.skipped,
            summary.directories,
            if summary.directories == 1 { "y" } else { "ies" }
        );
        Ok(WalkOutcome::Completed(summary))
    }

    /// Thumbnail one directory, recursing into subdirectories.
    ///
    /// `visited` holds the canonical path of every directory entered so far,
    /// so directory links pointing back up the tree are entered once.
    fn visit(
        &self,
        ctx: &TraversalContext,
        output_root: &Path,
        visited: &mut HashSet<PathBuf>,
        summary: &mut RunSummary,
        log: &mut RunLog,
    ) -> Result<()> {
        tracing::debug!("Entering {:?}", ctx.working_dir);
        std::fs::create_dir_all(&ctx.output_dir)
            .map_err(|e| ThumbError::directory(&ctx.output_dir, e))?;
        let mut resolver = CollisionResolver::from_dir(&ctx.output_dir)
            .map_err(|e| ThumbError::directory(&ctx.output_dir, e))?;
        summary.directories += 1;

        for entry in WalkDir::new(&ctx.working_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(ctx.working_dir.as_path()).to_path_buf();
                ThumbError::directory(path, e.into())
            })?;
            let path = entry.path();
            let name = entry.file_name();

            // Follows links, unlike the entry's own file type
            if path.is_dir() {
                if is_pseudo_entry(name) {
                    continue;
                }
                let target = path
                    .canonicalize()
                    .map_err(|e| ThumbError::directory(path, e))?;
                if target == output_root {
                    continue;
                }
                if self.recursive && is_child_of(path, &ctx.working_dir) {
                    if visited.insert(target) {
                        self.visit(&ctx.child(name), output_root, visited, summary, log)?;
                    } else {
                        tracing::debug!("Skipping {:?}, already visited", path);
                    }
                }
                continue;
            }

            // Removed since the listing was taken
            if !path.exists() {
                continue;
            }

            let file_name = name.to_string_lossy();
            match self
                .pipeline
                .process(path, &file_name, &ctx.output_dir, &mut resolver, log)
            {
                ProcessOutcome::Processed { .. } => summary.processed += 1,
                ProcessOutcome::Skipped => summary.skipped += 1,
            }
        }

        Ok(())
    }
}

/// `.` and `..` entries.
fn is_pseudo_entry(name: &OsStr) -> bool {
    name == OsStr::new(".") || name == OsStr::new("..")
}

/// Whether `path` sits directly below `parent`, compared component by component.
fn is_child_of(path: &Path, parent: &Path) -> bool {
    path.parent().is_some_and(|p| p.components().eq(parent.components()))
}
