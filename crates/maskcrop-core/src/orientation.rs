//! EXIF orientation normalization.
//!
//! Bakes the rotation/mirroring implied by an image's orientation metadata
//! into the pixel buffer itself, so later consumers never need the metadata.
//! Pure axis permutation and flips; color values are preserved byte-exactly
//! since no resampling occurs.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::error::CropError;

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (rotate 90 CW then flip horizontal).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (rotate 270 CW then flip horizontal).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    ///
    /// Rotations of 90° and 270° (and their flip variants Transpose/Transverse)
    /// swap the image dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Extract the EXIF orientation from encoded image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or the orientation
/// tag cannot be read.
pub fn orientation_from_bytes(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
        Err(_) => Orientation::Normal,
    }
}

/// Re-render a bitmap so its storage orientation is upright.
///
/// The stored pixels are physically reordered according to `orientation`,
/// producing a bitmap that displays correctly with no metadata dependency.
/// `Orientation::Normal` returns an equivalent bitmap (no-op semantics).
///
/// # Errors
///
/// Returns `CropError::BitmapCreation` if the target buffer cannot be
/// allocated.
pub fn normalize_orientation(bitmap: &Bitmap, orientation: Orientation) -> Result<Bitmap, CropError> {
    if orientation == Orientation::Normal {
        return Ok(bitmap.clone());
    }

    let (src_w, src_h) = (bitmap.width, bitmap.height);
    let (dst_w, dst_h) = if orientation.swaps_dimensions() {
        (src_h, src_w)
    } else {
        (src_w, src_h)
    };

    let mut output = Bitmap::try_allocate(dst_w, dst_h)?;

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            // Destination pixel (dx, dy) pulls from the source location that
            // the EXIF value says should land there when displayed upright.
            let (sx, sy) = match orientation {
                Orientation::Normal => (dx, dy),
                Orientation::FlipHorizontal => (src_w - 1 - dx, dy),
                Orientation::Rotate180 => (src_w - 1 - dx, src_h - 1 - dy),
                Orientation::FlipVertical => (dx, src_h - 1 - dy),
                Orientation::Transpose => (dy, dx),
                Orientation::Rotate90CW => (dy, src_h - 1 - dx),
                Orientation::Transverse => (src_w - 1 - dy, src_h - 1 - dx),
                Orientation::Rotate270CW => (src_w - 1 - dy, dx),
            };

            let src_idx = bitmap.pixel_index(sx, sy);
            let dst_idx = output.pixel_index(dx, dy);
            output.pixels[dst_idx..dst_idx + 4]
                .copy_from_slice(&bitmap.pixels[src_idx..src_idx + 4]);
        }
    }

    Ok(output)
}
