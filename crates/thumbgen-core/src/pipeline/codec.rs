//! Image decoding and encoding keyed by content-detected format.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};

/// Bytes read from the start of a file to classify it.
const HEADER_LEN: usize = 12;

/// A decoded raster together with the format it was read in.
///
/// Each stage takes the asset by value and hands a new one to the next, so a
/// buffer is dropped as soon as the following stage has consumed it.
#[derive(Debug)]
pub struct ImageAsset {
    /// File the raster was decoded from
    pub source_path: PathBuf,
    /// Detected format; encode writes the same one back
    pub format: ImageFormat,
    /// The raster itself
    pub image: DynamicImage,
}

impl ImageAsset {
    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Replace the raster, keeping path and format.
    pub fn with_image(self, image: DynamicImage) -> Self {
        Self { image, ..self }
    }
}

/// Reads and writes the four supported raster formats.
pub struct ImageCodec;

impl ImageCodec {
    /// Classify a file header. Only JPEG, PNG, GIF and BMP are recognized.
    pub fn sniff(header: &[u8]) -> Option<ImageFormat> {
        match header {
            // JPEG: FF D8 FF
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
            // PNG: 89 50 4E 47
            [0x89, b'P', b'N', b'G', ..] => Some(ImageFormat::Png),
            // GIF: GIF8
            [b'G', b'I', b'F', b'8', ..] => Some(ImageFormat::Gif),
            // BMP: BM
            [b'B', b'M', ..] => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Decode the file at `path`.
    ///
    /// Unreadable files and unrecognized headers are `NotAnImage`; a
    /// recognized header with a broken body is `Decode`.
    pub fn decode(path: &Path) -> PipelineResult<ImageAsset> {
        let not_an_image = || PipelineError::NotAnImage(path.to_path_buf());

        let mut file = File::open(path).map_err(|_| not_an_image())?;
        let mut header = Vec::with_capacity(HEADER_LEN);
        file.by_ref()
            .take(HEADER_LEN as u64)
            .read_to_end(&mut header)
            .map_err(|_| not_an_image())?;
        let format = Self::sniff(&header).ok_or_else(not_an_image)?;

        file.rewind().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot rewind file: {}", e),
        })?;
        let image = ImageReader::with_format(BufReader::new(file), format)
            .decode()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let (width, height) = image.dimensions();
        tracing::trace!("  Decoded {:?} as {} ({}x{})", path, format_name(format), width, height);

        Ok(ImageAsset {
            source_path: path.to_path_buf(),
            format,
            image,
        })
    }

    /// Write `asset` to `destination` in the asset's own format.
    pub fn encode(asset: &ImageAsset, destination: &Path) -> PipelineResult<()> {
        let result = match asset.format {
            // JPEG carries no alpha channel
            ImageFormat::Jpeg => asset
                .image
                .to_rgb8()
                .save_with_format(destination, ImageFormat::Jpeg),
            ImageFormat::Gif => asset
                .image
                .to_rgba8()
                .save_with_format(destination, ImageFormat::Gif),
            ImageFormat::Png | ImageFormat::Bmp => {
                asset.image.save_with_format(destination, asset.format)
            }
            other => {
                return Err(PipelineError::UnsupportedFormat {
                    path: destination.to_path_buf(),
                    format: format_name(other).to_string(),
                })
            }
        };

        result.map_err(|e| PipelineError::Encode {
            path: destination.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Lowercase name of an image format.
pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        _ => "unknown",
    }
}
