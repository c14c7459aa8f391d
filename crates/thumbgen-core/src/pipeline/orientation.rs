//! EXIF orientation lookup and rotation.

use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::codec::ImageAsset;

/// Clockwise rotation applied to a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Map an EXIF orientation value to a rotation.
    ///
    /// 3 → 180°, 6 → 270°, 8 → 90°. Everything else, including the
    /// mirrored orientations, is left alone.
    pub fn from_exif(orientation: u32) -> Self {
        match orientation {
            3 => Rotation::Cw180,
            6 => Rotation::Cw270,
            8 => Rotation::Cw90,
            _ => Rotation::None,
        }
    }

    /// Rotation in degrees clockwise.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 90,
            Rotation::Cw180 => 180,
            Rotation::Cw270 => 270,
        }
    }
}

/// Reads orientation metadata and rotates rasters to match.
pub struct OrientationCorrector;

impl OrientationCorrector {
    /// Raw EXIF orientation tag of a file, if it has one.
    pub fn orientation(path: &Path) -> Option<u32> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let exif = Reader::new().read_from_container(&mut reader).ok()?;

        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Short(v) => v.first().map(|&x| x as u32),
                Value::Long(v) => v.first().copied(),
                _ => None,
            })
    }

    /// Rotation needed for the file at `path`.
    ///
    /// Missing or unreadable metadata means no rotation.
    pub fn rotation_for(path: &Path) -> Rotation {
        Self::orientation(path)
            .map(Rotation::from_exif)
            .unwrap_or_default()
    }

    /// Rotate `asset` clockwise. `Rotation::None` hands back the same buffer.
    pub fn apply(asset: ImageAsset, rotation: Rotation) -> ImageAsset {
        let rotated = match rotation {
            Rotation::None => return asset,
            Rotation::Cw90 => asset.image.rotate90(),
            Rotation::Cw180 => asset.image.rotate180(),
            Rotation::Cw270 => asset.image.rotate270(),
        };
        asset.with_image(rotated)
    }
}
