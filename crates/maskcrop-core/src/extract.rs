//! Crop state extraction.
//!
//! Converts the live pan/zoom/rotate state of a scrollable image surface
//! into a canonical crop description: a rect in the original bitmap's own
//! pixel space, a rotation angle, and the effective zoom scale. The
//! description is the sole contract between live interaction and the final
//! render; it is computed on demand and never persisted.
//!
//! Extraction is a pure function over an explicit value snapshot of the
//! surface (`TransformState`) - the engine never reaches into a UI object,
//! so the math is testable without a UI harness.

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::{Point, Rect, Size};

/// A snapshot of the pannable/zoomable image surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// The zoomed-content coordinate currently coinciding with the mask
    /// rect's top-left corner.
    pub content_offset: Point,
    /// Current zoom scale. Always positive; the caller clamps it to the
    /// configured [min, max] range.
    pub zoom_scale: f64,
    /// Current rotation angle in radians, normalized to [0, 2π).
    /// Always 0 when rotation is disabled.
    pub rotation_angle: f64,
    /// Total size of the zoomed content (base content size times zoom).
    pub content_size: Size,
}

impl TransformState {
    pub fn new(content_offset: Point, zoom_scale: f64, rotation_angle: f64, content_size: Size) -> Self {
        Self {
            content_offset,
            zoom_scale,
            rotation_angle,
            content_size,
        }
    }

    /// The rotation angle wrapped into [0, 2π).
    pub fn normalized_rotation_angle(&self) -> f64 {
        self.rotation_angle.rem_euclid(std::f64::consts::TAU)
    }
}

/// The canonical, resolution-independent output of crop state extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropDescription {
    /// The crop rect in original-bitmap pixel space. Kept in f64; rounding
    /// to integer pixels happens only at extraction time so repeated live
    /// queries do not compound rounding error.
    pub rect: Rect,
    /// Rotation angle in radians.
    pub rotation_angle: f64,
    /// The zoom scale that produced the rect.
    pub zoom_scale: f64,
}

/// Compute the canonical crop description for the current transform state.
///
/// # Algorithm
///
/// 1. Inverse-map the mask rect's corners through the pan offset into
///    zoomed-content coordinates (with the `content_offset` convention the
///    mask origin cancels out).
/// 2. Divide by the zoom scale into base content space, then scale by the
///    ratio of bitmap size to base content size per axis. Non-uniform
///    content scale is supported.
/// 3. Clamp the result into the bitmap bounds. The clamp runs
///    unconditionally: a pan past the content edge is a valid input state
///    and clamps silently. When `avoid_empty_space` is set, the
///    movement-rect resolver is what actually keeps the mask covered, so
///    the clamp is a safety net there rather than the primary mechanism;
///    the flag does not change the math and is accepted for contract
///    parity with the configuration surface.
/// 4. Copy rotation angle and zoom scale verbatim.
///
/// # Errors
///
/// `DegenerateGeometry` if the zoom scale is not positive, the mask rect
/// has zero area, or the content size is empty. These are preconditions for
/// the divisions above; surfacing them catches upstream bugs instead of
/// emitting NaN geometry.
pub fn extract_crop_description(
    state: &TransformState,
    mask_rect: Rect,
    bitmap_size: Size,
    _avoid_empty_space: bool,
) -> Result<CropDescription, CropError> {
    if state.zoom_scale <= 0.0 || !state.zoom_scale.is_finite() {
        return Err(CropError::DegenerateGeometry(format!(
            "zoom scale must be positive and finite, got {}",
            state.zoom_scale
        )));
    }
    if mask_rect.area() <= 0.0 {
        return Err(CropError::DegenerateGeometry(format!(
            "mask rect has zero area: {mask_rect:?}"
        )));
    }
    if state.content_size.is_empty() {
        return Err(CropError::DegenerateGeometry(format!(
            "content size is empty: {:?}",
            state.content_size
        )));
    }
    if bitmap_size.is_empty() {
        return Err(CropError::DegenerateGeometry(format!(
            "bitmap size is empty: {bitmap_size:?}"
        )));
    }

    // Step 1: visible zoomed-content rect under the mask.
    let visible = Rect::new(
        state.content_offset.x,
        state.content_offset.y,
        mask_rect.width(),
        mask_rect.height(),
    );

    // Step 2: into base content space, then into bitmap pixel space. The
    // content size already has the zoom scale folded in.
    let base_w = state.content_size.w / state.zoom_scale;
    let base_h = state.content_size.h / state.zoom_scale;
    let scale_x = bitmap_size.w / base_w;
    let scale_y = bitmap_size.h / base_h;

    let rect = Rect::new(
        visible.min_x() / state.zoom_scale * scale_x,
        visible.min_y() / state.zoom_scale * scale_y,
        visible.width() / state.zoom_scale * scale_x,
        visible.height() / state.zoom_scale * scale_y,
    );

    // Step 3: clamp into the bitmap bounds. Always a silent safety net,
    // never an assertion - emptiness avoidance is the movement resolver's
    // job and is not guaranteed end-to-end for external geometry.
    let bounds = Rect::new(0.0, 0.0, bitmap_size.w, bitmap_size.h);
    let rect = rect.intersection(&bounds);

    Ok(CropDescription {
        rect,
        rotation_angle: state.rotation_angle,
        zoom_scale: state.zoom_scale,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for valid transform states over a fit-to-mask content size.
    fn state_strategy() -> impl Strategy<Value = TransformState> {
        (
            -200.0f64..=600.0, // offset x
            -200.0f64..=600.0, // offset y
            0.25f64..=8.0,     // zoom
            0.0f64..6.28,      // rotation
        )
            .prop_map(|(x, y, zoom, angle)| {
                TransformState::new(
                    Point::new(x, y),
                    zoom,
                    angle,
                    Size::new(400.0 * zoom, 400.0 * zoom),
                )
            })
    }

    proptest! {
        /// Property: the extracted rect is always inside the bitmap bounds.
        #[test]
        fn prop_rect_inside_bitmap(state in state_strategy()) {
            let mask = Rect::new(100.0, 100.0, 200.0, 200.0);
            let bitmap = Size::new(400.0, 400.0);
            let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);

            let desc = extract_crop_description(&state, mask, bitmap, false).unwrap();
            prop_assert!(bounds.contains_rect(&desc.rect) || desc.rect.is_empty());
        }

        /// Property: extraction is deterministic and side-effect free.
        #[test]
        fn prop_extraction_idempotent(state in state_strategy()) {
            let mask = Rect::new(100.0, 100.0, 200.0, 200.0);
            let bitmap = Size::new(400.0, 400.0);

            let a = extract_crop_description(&state, mask, bitmap, false).unwrap();
            let b = extract_crop_description(&state, mask, bitmap, false).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: all components of the result are finite.
        #[test]
        fn prop_no_nan_geometry(state in state_strategy()) {
            let mask = Rect::new(50.0, 50.0, 300.0, 300.0);
            let bitmap = Size::new(1000.0, 750.0);

            let desc = extract_crop_description(&state, mask, bitmap, false).unwrap();
            prop_assert!(desc.rect.min_x().is_finite());
            prop_assert!(desc.rect.min_y().is_finite());
            prop_assert!(desc.rect.width().is_finite());
            prop_assert!(desc.rect.height().is_finite());
            prop_assert!(desc.rect.width() >= 0.0);
            prop_assert!(desc.rect.height() >= 0.0);
        }

        /// Property: zooming in shrinks the extracted rect.
        #[test]
        fn prop_zoom_shrinks_rect(zoom in 1.0f64..=8.0) {
            let mask = Rect::new(100.0, 100.0, 200.0, 200.0);
            let bitmap = Size::new(400.0, 400.0);

            let state = TransformState::new(
                Point::new(0.0, 0.0),
                zoom,
                0.0,
                Size::new(400.0 * zoom, 400.0 * zoom),
            );
            let desc = extract_crop_description(&state, mask, bitmap, false).unwrap();

            let expected = 200.0 / zoom;
            prop_assert!((desc.rect.width() - expected).abs() < 1e-9);
            prop_assert!((desc.rect.height() - expected).abs() < 1e-9);
        }
    }
}
