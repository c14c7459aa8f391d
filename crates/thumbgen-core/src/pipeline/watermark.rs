//! Watermark loading and stamping.

use image::{imageops, DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};

use super::codec::{ImageAsset, ImageCodec};
use crate::error::PipelineResult;

/// Offsets of the watermark from the target's right and bottom edges.
///
/// An unset margin centers the watermark along that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatermarkPlacement {
    pub margin_right: Option<i64>,
    pub margin_bottom: Option<i64>,
}

/// A decoded watermark, loaded once and shared read-only.
#[derive(Debug)]
pub struct Watermark {
    path: PathBuf,
    image: DynamicImage,
}

impl Watermark {
    /// Decode the watermark file.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let asset = ImageCodec::decode(path)?;
        tracing::debug!(
            "Loaded watermark {:?} ({}x{})",
            path,
            asset.width(),
            asset.height()
        );
        Ok(Self {
            path: path.to_path_buf(),
            image: asset.image,
        })
    }

    /// Wrap an already decoded raster.
    pub fn from_image(path: impl Into<PathBuf>, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            image,
        }
    }

    /// File the watermark was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Watermark dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Top-left corner of the watermark on a `target_width`x`target_height` raster.
    ///
    /// Missing margins become `target / 2 - watermark / 2`, so the default
    /// places the watermark in the middle. Fractional positions truncate.
    pub fn position(
        &self,
        target_width: u32,
        target_height: u32,
        placement: WatermarkPlacement,
    ) -> (i64, i64) {
        let (wm_width, wm_height) = self.dimensions();
        let axis = |target: u32, wm: u32, margin: Option<i64>| -> i64 {
            let (target, wm) = (f64::from(target), f64::from(wm));
            let margin = margin.map_or(target / 2.0 - wm / 2.0, |m| m as f64);
            (target - wm - margin) as i64
        };
        (
            axis(target_width, wm_width, placement.margin_right),
            axis(target_height, wm_height, placement.margin_bottom),
        )
    }

    /// Copy the watermark over `target`. Pixels are overwritten, not blended,
    /// and anything outside the target is clipped.
    pub fn composite(&self, mut target: ImageAsset, placement: WatermarkPlacement) -> ImageAsset {
        let (x, y) = self.position(target.width(), target.height(), placement);
        imageops::replace(&mut target.image, &self.image, x, y);
        target
    }

    /// Decode the image at `path`, stamp it and write it back in its own format.
    pub fn stamp_file(&self, path: &Path, placement: WatermarkPlacement) -> PipelineResult<()> {
        let target = ImageCodec::decode(path)?;
        let stamped = self.composite(target, placement);
        ImageCodec::encode(&stamped, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures;
    use image::{ImageFormat, Rgba, RgbaImage};

    const MARK: Rgba<u8> = Rgba([255, 0, 255, 255]);
    const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn watermark(size: u32) -> Watermark {
        Watermark::from_image(
            "mark.png",
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(size, size, MARK)),
        )
    }

    fn target(width: u32, height: u32) -> ImageAsset {
        ImageAsset {
            source_path: PathBuf::from("target.png"),
            format: ImageFormat::Png,
            image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, BACKGROUND)),
        }
    }

    #[test]
    fn test_default_position_is_centered() {
        let wm = watermark(20);
        // 100 - 20 - (50 - 10) = 60
        assert_eq!(wm.position(100, 100, WatermarkPlacement::default()), (60, 60));
    }

    #[test]
    fn test_position_with_margins() {
        let wm = watermark(20);
        let placement = WatermarkPlacement {
            margin_right: Some(5),
            margin_bottom: None,
        };
        assert_eq!(wm.position(100, 60, placement), (75, 20));

        let flush = WatermarkPlacement {
            margin_right: Some(0),
            margin_bottom: Some(0),
        };
        assert_eq!(wm.position(100, 60, flush), (80, 40));
    }

    #[test]
    fn test_position_odd_sizes_truncate() {
        let wm = watermark(20);
        // 101 - 20 - (50.5 - 10) = 40.5
        assert_eq!(wm.position(101, 101, WatermarkPlacement::default()), (40, 40));
    }

    #[test]
    fn test_composite_overwrites_pixels() {
        let stamped = watermark(20).composite(target(100, 100), WatermarkPlacement::default());
        let img = stamped.image.to_rgba8();
        assert_eq!(*img.get_pixel(60, 60), MARK);
        assert_eq!(*img.get_pixel(79, 79), MARK);
        assert_eq!(*img.get_pixel(59, 60), BACKGROUND);
        assert_eq!(*img.get_pixel(80, 80), BACKGROUND);
        assert_eq!(stamped.image.dimensions(), (100, 100));
    }

    #[test]
    fn test_composite_larger_watermark_is_clipped() {
        let stamped = watermark(50).composite(target(10, 10), WatermarkPlacement::default());
        let img = stamped.image.to_rgba8();
        assert_eq!(img.dimensions(), (10, 10));
        assert!(img.pixels().all(|p| *p == MARK));
    }

    #[test]
    fn test_stamp_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_image(dir.path(), "thumb.png", 100, 100, ImageFormat::Png);

        watermark(20)
            .stamp_file(&path, WatermarkPlacement::default())
            .unwrap();

        let reread = ImageCodec::decode(&path).unwrap();
        assert_eq!(reread.format, ImageFormat::Png);
        assert_eq!(reread.image.get_pixel(70, 70), MARK);
        assert_ne!(reread.image.get_pixel(10, 10), MARK);
    }

    #[test]
    fn test_stamp_file_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.txt");
        std::fs::write(&path, "text").unwrap();
        assert!(watermark(4)
            .stamp_file(&path, WatermarkPlacement::default())
            .is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "text");
    }

    #[test]
    fn test_load_missing_watermark() {
        assert!(Watermark::load(Path::new("/nonexistent/mark.png")).is_err());
    }

    #[test]
    fn test_load_watermark() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixtures::write_image(dir.path(), "mark.bmp", 12, 8, ImageFormat::Bmp);
        let wm = Watermark::load(&path).unwrap();
        assert_eq!(wm.dimensions(), (12, 8));
        assert_eq!(wm.path(), path.as_path());
    }
}
