//! Thumbnail pipeline components.
//!
//! This module contains all the stages of the thumbnail pipeline:
//! - **codec**: Detect, decode and encode JPEG, GIF, PNG and BMP files
//! - **resize**: Scale rasters by a percentage ratio
//! - **orientation**: Read EXIF orientation and rotate to match
//! - **watermark**: Stamp a watermark onto written thumbnails
//! - **collision**: Pick non-colliding output names
//! - **processor**: Runs the stages for one file
//! - **walker**: Traverses the working directory

pub mod codec;
pub mod collision;
pub mod orientation;
pub mod processor;
pub mod resize;
pub mod walker;
pub mod watermark;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-exports for convenient access
pub use codec::{ImageAsset, ImageCodec};
pub use collision::CollisionResolver;
pub use orientation::{OrientationCorrector, Rotation};
pub use processor::ThumbnailPipeline;
pub use resize::{ResizeRatio, Resizer};
pub use walker::{DirectoryWalker, TraversalContext};
pub use watermark::{Watermark, WatermarkPlacement};
