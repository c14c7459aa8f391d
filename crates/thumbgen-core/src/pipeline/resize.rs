//! Percentage-based thumbnail resizing.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use super::codec::ImageAsset;
use crate::error::{PipelineError, PipelineResult};

/// Reduction ratio applied independently to width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeRatio {
    /// Target width as a percentage of the source width
    pub width_percent: u32,
    /// Target height as a percentage of the source height
    pub height_percent: u32,
}

impl ResizeRatio {
    /// Build a ratio; an unset height uses the width percentage.
    pub fn new(width_percent: u32, height_percent: Option<u32>) -> Self {
        Self {
            width_percent,
            height_percent: height_percent.unwrap_or(width_percent),
        }
    }
}

impl Default for ResizeRatio {
    fn default() -> Self {
        Self::new(50, None)
    }
}

/// Bytes per pixel of the intermediate `Rgba<f32>` buffer used while resampling.
const RESAMPLE_BYTES_PER_PIXEL: u64 = 16;

fn max_alloc() -> u64 {
    image::Limits::default().max_alloc.unwrap_or(u64::MAX)
}

/// Whether a `width`x`height` raster stays under the decoder allocation limit.
fn fits_allocation(width: u32, height: u32, bytes_per_pixel: u64) -> bool {
    u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|pixels| pixels.checked_mul(bytes_per_pixel))
        .is_some_and(|bytes| bytes <= max_alloc())
}

/// Resamples assets to a fraction of their size.
pub struct Resizer {
    ratio: ResizeRatio,
}

impl Resizer {
    /// Create a resizer for the given ratio.
    pub fn new(ratio: ResizeRatio) -> Self {
        Self { ratio }
    }

    /// The configured ratio.
    pub fn ratio(&self) -> ResizeRatio {
        self.ratio
    }

    /// `floor(width * wp / 100)` by `floor(height * hp / 100)`.
    ///
    /// Returns `None` for a zero-area target or one that does not fit in `u32`.
    pub fn target_dimensions(width: u32, height: u32, ratio: ResizeRatio) -> Option<(u32, u32)> {
        let scale = |side: u32, percent: u32| -> Option<u32> {
            let scaled = u64::from(side) * u64::from(percent) / 100;
            u32::try_from(scaled).ok().filter(|&s| s > 0)
        };
        Some((
            scale(width, ratio.width_percent)?,
            scale(height, ratio.height_percent)?,
        ))
    }

    /// Resample `asset` to the target size.
    ///
    /// Uses a triangle (bilinear) filter whose support widens with the scale
    /// factor, so downscaling averages over the covered source area. Targets
    /// whose raster would exceed the allocation limit fail with
    /// `PipelineError::Resize` before any buffer is allocated.
    pub fn resize(&self, asset: ImageAsset) -> PipelineResult<ImageAsset> {
        let (width, height) = (asset.width(), asset.height());
        let Some((target_width, target_height)) =
            Self::target_dimensions(width, height, self.ratio)
        else {
            return Err(PipelineError::Resize {
                path: asset.source_path,
                message: format!(
                    "{}x{} at {}%x{}% has no drawable area",
                    width, height, self.ratio.width_percent, self.ratio.height_percent
                ),
            });
        };

        let bytes_per_pixel = u64::from(asset.image.color().bytes_per_pixel());
        if !fits_allocation(width, target_height, RESAMPLE_BYTES_PER_PIXEL)
            || !fits_allocation(target_width, target_height, bytes_per_pixel)
        {
            return Err(PipelineError::Resize {
                path: asset.source_path,
                message: format!(
                    "{}x{} target raster exceeds the {} byte allocation limit",
                    target_width,
                    target_height,
                    max_alloc()
                ),
            });
        }

        let resized = asset
            .image
            .resize_exact(target_width, target_height, FilterType::Triangle);
        Ok(asset.with_image(resized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use std::path::PathBuf;

    fn asset(width: u32, height: u32) -> ImageAsset {
        ImageAsset {
            source_path: PathBuf::from("/photos/test.png"),
            format: ImageFormat::Png,
            image: DynamicImage::new_rgb8(width, height),
        }
    }

    #[test]
    fn test_ratio_height_defaults_to_width() {
        assert_eq!(
            ResizeRatio::new(30, None),
            ResizeRatio {
                width_percent: 30,
                height_percent: 30
            }
        );
        assert_eq!(ResizeRatio::new(30, Some(60)).height_percent, 60);
        assert_eq!(ResizeRatio::default(), ResizeRatio::new(50, Some(50)));
    }

    #[test]
    fn test_target_dimensions_floor() {
        let ratio = ResizeRatio::new(50, None);
        assert_eq!(Resizer::target_dimensions(101, 33, ratio), Some((50, 16)));

        let ratio = ResizeRatio::new(33, Some(10));
        assert_eq!(Resizer::target_dimensions(1000, 999, ratio), Some((330, 99)));
    }

    #[test]
    fn test_target_dimensions_zero_area() {
        assert_eq!(Resizer::target_dimensions(100, 100, ResizeRatio::new(0, None)), None);
        assert_eq!(Resizer::target_dimensions(1, 100, ResizeRatio::new(50, None)), None);
    }

    #[test]
    fn test_target_dimensions_overflow() {
        let ratio = ResizeRatio::new(u32::MAX, None);
        assert_eq!(Resizer::target_dimensions(u32::MAX, 10, ratio), None);
    }

    #[test]
    fn test_resize_dimensions() {
        let resizer = Resizer::new(ResizeRatio::new(25, Some(75)));
        let out = resizer.resize(asset(200, 120)).unwrap();
        assert_eq!(out.image.dimensions(), (50, 90));
        assert_eq!(out.format, ImageFormat::Png);
        assert_eq!(out.source_path, PathBuf::from("/photos/test.png"));
    }

    #[test]
    fn test_resize_upscale() {
        let resizer = Resizer::new(ResizeRatio::new(200, None));
        let out = resizer.resize(asset(10, 7)).unwrap();
        assert_eq!(out.image.dimensions(), (20, 14));
    }

    #[test]
    fn test_resize_zero_ratio_fails() {
        let resizer = Resizer::new(ResizeRatio::new(0, Some(50)));
        let err = resizer.resize(asset(100, 100)).unwrap_err();
        assert!(matches!(err, PipelineError::Resize { .. }));
    }

    #[test]
    fn test_resize_unallocatable_target_fails() {
        // Both sides fit in u32 but the raster would need terabytes
        let resizer = Resizer::new(ResizeRatio::new(u32::MAX, Some(10_000_000)));
        let err = resizer.resize(asset(1, 1)).unwrap_err();
        assert!(matches!(err, PipelineError::Resize { ref path, .. } if path == &PathBuf::from("/photos/test.png")));
    }

    #[test]
    fn test_fits_allocation() {
        assert!(fits_allocation(4000, 3000, RESAMPLE_BYTES_PER_PIXEL));
        assert!(!fits_allocation(u32::MAX, u32::MAX, 1));
        assert!(!fits_allocation(42_949_672, 100_000, 3));
    }

    #[test]
    fn test_resize_averages_pixels() {
        // Alternating black/white columns average to mid grey, not to one of the two
        let mut img = RgbImage::new(64, 64);
        for (x, _, px) in img.enumerate_pixels_mut() {
            *px = if x % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) };
        }
        let source = ImageAsset {
            source_path: PathBuf::from("stripes.png"),
            format: ImageFormat::Png,
            image: DynamicImage::ImageRgb8(img),
        };

        let out = Resizer::new(ResizeRatio::new(25, None)).resize(source).unwrap();
        let center = out.image.to_rgb8().get_pixel(8, 8).0[0];
        assert!((96..=160).contains(&center), "got {center}");
    }
}
