//! Pipeline orchestration - turns one source file into one thumbnail.

use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::log::RunLog;
use crate::types::{ProcessOutcome, ThumbnailJob};

use super::codec::{ImageAsset, ImageCodec};
use super::collision::CollisionResolver;
use super::orientation::OrientationCorrector;
use super::resize::{ResizeRatio, Resizer};
use super::watermark::{Watermark, WatermarkPlacement};

/// Decode → resize → rotate → encode → stamp, for one file at a time.
pub struct ThumbnailPipeline {
    resizer: Resizer,
    watermark: Option<Watermark>,
    placement: WatermarkPlacement,
}

impl Default for ThumbnailPipeline {
    fn default() -> Self {
        Self::new(ResizeRatio::default())
    }
}

impl ThumbnailPipeline {
    /// Create a pipeline without a watermark.
    pub fn new(ratio: ResizeRatio) -> Self {
        Self {
            resizer: Resizer::new(ratio),
            watermark: None,
            placement: WatermarkPlacement::default(),
        }
    }

    /// Replace the reduction ratio.
    pub fn with_ratio(mut self, ratio: ResizeRatio) -> Self {
        self.resizer = Resizer::new(ratio);
        self
    }

    /// Stamp `watermark` on every thumbnail written from now on.
    pub fn with_watermark(mut self, watermark: Watermark, placement: WatermarkPlacement) -> Self {
        self.watermark = Some(watermark);
        self.placement = placement;
        self
    }

    /// The reduction ratio thumbnails are written at.
    pub fn ratio(&self) -> ResizeRatio {
        self.resizer.ratio()
    }

    /// The watermark stamped on each thumbnail, if any.
    pub fn watermark(&self) -> Option<&Watermark> {
        self.watermark.as_ref()
    }

    /// Thumbnail `source` into `output_dir`.
    ///
    /// Never fails: anything that goes wrong is recorded in `log` and the
    /// file is reported as skipped.
    pub fn process(
        &self,
        source: &Path,
        file_name: &str,
        output_dir: &Path,
        resolver: &mut CollisionResolver,
        log: &mut RunLog,
    ) -> ProcessOutcome {
        let start = std::time::Instant::now();
        tracing::debug!("Processing: {:?}", source);

        let asset = match ImageCodec::decode(source) {
            Ok(asset) => asset,
            Err(PipelineError::NotAnImage(_)) => {
                tracing::debug!("Skipping non-image {:?}", source);
                log.push(format!("Not an image {}", source.display()));
                return ProcessOutcome::Skipped;
            }
            Err(e) => return Self::reject(file_name, e, log),
        };

        let job = ThumbnailJob {
            source_path: source.to_path_buf(),
            destination_dir: output_dir.to_path_buf(),
            output_file_name: resolver.resolve(file_name),
        };

        let output = job.output_path();
        if let Err(e) = self.render(asset, &job) {
            return Self::reject(file_name, e, log);
        }

        if let Some(watermark) = &self.watermark {
            if let Err(e) = watermark.stamp_file(&output, self.placement) {
                tracing::debug!("Watermark not applied to {:?}: {}", output, e);
            }
        }

        tracing::debug!("Wrote {:?} in {:?}", output, start.elapsed());
        ProcessOutcome::Processed { output }
    }

    /// Resize, rotate and encode a decoded asset to the job's output path.
    fn render(&self, asset: ImageAsset, job: &ThumbnailJob) -> PipelineResult<()> {
        let resized = self.resizer.resize(asset)?;
        tracing::trace!("  Resized to {}x{}", resized.width(), resized.height());

        let rotation = OrientationCorrector::rotation_for(&job.source_path);
        let rotated = OrientationCorrector::apply(resized, rotation);
        tracing::trace!("  Rotated {} degrees", rotation.degrees());

        ImageCodec::encode(&rotated, &job.output_path())
    }

    fn reject(file_name: &str, error: PipelineError, log: &mut RunLog) -> ProcessOutcome {
        tracing::warn!("Skipping {}: {}", file_name, error);
        log.push(format!("Not a valid image format {}", file_name));
        ProcessOutcome::Skipped
    }
}
