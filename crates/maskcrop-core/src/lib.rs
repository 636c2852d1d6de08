//! Maskcrop Core - Crop geometry and image transform engine
//!
//! This crate turns the live pan/zoom/rotate state of a masked, scrollable
//! image surface into a canonical crop description and renders the final
//! cropped bitmap. It covers mask/movement geometry resolution, EXIF
//! orientation normalization, crop state extraction, and rotation/crop
//! pixel operations.
//!
//! The presentation layer (view lifecycle, gestures, chrome layout) is an
//! external collaborator: it feeds user-driven parameters in and receives
//! computed geometry plus a final bitmap back. The engine holds no
//! reference to it and keeps no state between calls.

pub mod bitmap;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod mask;
pub mod orientation;
pub mod transform;

use serde::{Deserialize, Serialize};

pub use bitmap::Bitmap;
pub use error::CropError;
pub use extract::{extract_crop_description, CropDescription, TransformState};
pub use geometry::{OutlinePath, Point, Rect, Size};
pub use mask::{resolve_mask, resolve_movement_rect, CropMode, CustomGeometryProvider};
pub use orientation::{normalize_orientation, orientation_from_bytes, Orientation};
pub use transform::{compute_rotated_bounds, crop_bitmap, rotate_bitmap, Interpolation};

/// Configuration for the crop engine.
///
/// One immutable value constructed once, in place of a pile of independent
/// tunable fields, so the configuration can never be partially updated
/// mid-interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropConfig {
    /// Inset of the circle mask within the container in portrait orientation.
    pub portrait_circle_inset: f64,
    /// Inset of the square mask within the container in portrait orientation.
    pub portrait_square_inset: f64,
    /// Inset of the circle mask within the container in landscape orientation.
    pub landscape_circle_inset: f64,
    /// Inset of the square mask within the container in landscape orientation.
    pub landscape_square_inset: f64,
    /// Minimum allowed zoom scale.
    pub min_zoom: f64,
    /// Maximum allowed zoom scale.
    pub max_zoom: f64,
    /// Whether the rotation gesture is enabled. When false, transform
    /// states carry a rotation angle of 0.
    pub rotation_enabled: bool,
    /// Whether the image must always fill the mask space.
    pub avoid_empty_space: bool,
    /// Whether the mask outline is re-applied to the cropped output as an
    /// alpha clip.
    pub apply_mask_to_output: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            portrait_circle_inset: 15.0,
            portrait_square_inset: 20.0,
            landscape_circle_inset: 45.0,
            landscape_square_inset: 45.0,
            min_zoom: 1.0,
            max_zoom: 10.0,
            rotation_enabled: false,
            avoid_empty_space: false,
            apply_mask_to_output: false,
        }
    }
}

impl CropConfig {
    /// Create a new CropConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp a zoom scale into the configured [min, max] range.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Commit the current interaction state: extract the crop description and
/// render the cropped bitmap in one call.
///
/// Returns both the bitmap and the description that produced it, so the
/// caller can report what was cropped without recomputation. The bitmap is
/// expected to already be orientation-normalized (see
/// [`normalize_orientation`]).
///
/// # Errors
///
/// Propagates errors from [`extract_crop_description`] and [`crop_bitmap`].
pub fn render_cropped(
    bitmap: &Bitmap,
    state: &TransformState,
    mask_rect: Rect,
    mask_path: &OutlinePath,
    config: &CropConfig,
    filter: Interpolation,
) -> Result<(Bitmap, CropDescription), CropError> {
    let description =
        extract_crop_description(state, mask_rect, bitmap.size(), config.avoid_empty_space)?;
    let cropped = crop_bitmap(
        bitmap,
        &description,
        config.apply_mask_to_output,
        Some(mask_path),
        filter,
    )?;
    Ok((cropped, description))
}
