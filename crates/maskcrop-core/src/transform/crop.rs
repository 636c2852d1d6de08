//! Crop extraction from a (possibly rotated) bitmap.
//!
//! Consumes the crop description produced by state extraction and pulls the
//! described sub-rectangle out of the source bitmap, rotating first when the
//! description carries an angle and optionally re-applying the mask outline
//! as an alpha clip.

use std::f64::consts::TAU;

use crate::bitmap::Bitmap;
use crate::error::CropError;
use crate::extract::CropDescription;
use crate::geometry::{polylines_contain, OutlinePath, Point, Rect};
use crate::transform::rotate::{rotate_bitmap, Interpolation};

const ANGLE_EPSILON: f64 = 1e-6;

/// Extract the region described by `description` from `bitmap`.
///
/// # Algorithm
///
/// 1. If the description carries a rotation angle, rotate the bitmap first
///    and remap the crop rect into the rotated canvas by forward-rotating
///    its corners about the source center and re-bounding to an
///    axis-aligned rect.
/// 2. Round the rect to integer pixel bounds (nearest-pixel; sub-pixel
///    error is expected and bounded to ±1 pixel per edge) and copy that
///    sub-region into a new bitmap.
/// 3. If `apply_mask` is set and a mask path is supplied, scale/translate
///    the path onto the extracted bitmap and clear the pixels whose centers
///    fall outside the outline.
///
/// # Errors
///
/// - `ExtractionOutOfBounds` if the rounded rect has zero width or height
///   after clamping to the (rotated) canvas.
/// - `DegenerateGeometry` if a mask path with an empty bounding box is
///   supplied for re-masking.
/// - `BitmapCreation` if the output buffer cannot be allocated.
pub fn crop_bitmap(
    bitmap: &Bitmap,
    description: &CropDescription,
    apply_mask: bool,
    mask_path: Option<&OutlinePath>,
    filter: Interpolation,
) -> Result<Bitmap, CropError> {
    let angle = description.rotation_angle.rem_euclid(TAU);
    let rotated;

    let (source, rect) = if angle > ANGLE_EPSILON && TAU - angle > ANGLE_EPSILON {
        rotated = rotate_bitmap(bitmap, angle, filter);
        let remapped = remap_rect_into_rotated(description.rect, bitmap, &rotated, angle);
        (&rotated, remapped)
    } else {
        (bitmap, description.rect)
    };

    let mut output = extract_rect(source, rect)?;

    if apply_mask {
        if let Some(path) = mask_path {
            apply_mask_path(&mut output, path)?;
        }
    }

    Ok(output)
}

/// Forward-rotate the crop rect's corners about the source center into the
/// rotated canvas and take their axis-aligned bounding box.
fn remap_rect_into_rotated(rect: Rect, source: &Bitmap, rotated: &Bitmap, angle: f64) -> Rect {
    let cos = angle.cos();
    let sin = angle.sin();
    let src_cx = source.width as f64 / 2.0;
    let src_cy = source.height as f64 / 2.0;
    let dst_cx = rotated.width as f64 / 2.0;
    let dst_cy = rotated.height as f64 / 2.0;

    let corners = [
        Point::new(rect.min_x(), rect.min_y()),
        Point::new(rect.max_x(), rect.min_y()),
        Point::new(rect.max_x(), rect.max_y()),
        Point::new(rect.min_x(), rect.max_y()),
    ];

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for corner in corners {
        let px = corner.x - src_cx;
        let py = corner.y - src_cy;
        // Clockwise rotation in y-down coordinates
        let x = px * cos - py * sin + dst_cx;
        let y = px * sin + py * cos + dst_cy;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Round the rect to integer pixel bounds, clamp to the bitmap, and copy
/// the sub-region row by row.
fn extract_rect(bitmap: &Bitmap, rect: Rect) -> Result<Bitmap, CropError> {
    let x0 = (rect.min_x().round() as i64).clamp(0, bitmap.width as i64);
    let y0 = (rect.min_y().round() as i64).clamp(0, bitmap.height as i64);
    let x1 = (rect.max_x().round() as i64).clamp(0, bitmap.width as i64);
    let y1 = (rect.max_y().round() as i64).clamp(0, bitmap.height as i64);

    if x1 <= x0 || y1 <= y0 {
        return Err(CropError::ExtractionOutOfBounds);
    }

    let out_w = (x1 - x0) as u32;
    let out_h = (y1 - y0) as u32;
    let mut output = Bitmap::try_allocate(out_w, out_h)?;

    let row_bytes = out_w as usize * 4;
    for y in 0..out_h {
        let src_start = bitmap.pixel_index(x0 as u32, y0 as u32 + y);
        let dst_start = y as usize * row_bytes;
        output.pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&bitmap.pixels[src_start..src_start + row_bytes]);
    }

    Ok(output)
}

/// Re-render the mask outline over the extracted bitmap as an alpha clip:
/// pixels whose centers fall outside the outline become fully transparent.
///
/// The path is fitted to the bitmap by scaling/translating its own bounding
/// box onto the bitmap bounds, matching how the mask visually framed the
/// extracted region.
fn apply_mask_path(bitmap: &mut Bitmap, path: &OutlinePath) -> Result<(), CropError> {
    let path_bounds = path.bounding_rect();
    if path_bounds.is_empty() {
        return Err(CropError::DegenerateGeometry(
            "mask path has an empty bounding box".to_string(),
        ));
    }

    let scale_x = bitmap.width as f64 / path_bounds.width();
    let scale_y = bitmap.height as f64 / path_bounds.height();
    let fitted = path.transformed(
        scale_x,
        scale_y,
        -path_bounds.min_x() * scale_x,
        -path_bounds.min_y() * scale_y,
    );

    // Flatten once; containment is tested per pixel center
    let polylines = fitted.flattened();

    for y in 0..bitmap.height {
        for x in 0..bitmap.width {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if !polylines_contain(&polylines, center) {
                let idx = bitmap.pixel_index(x, y);
                bitmap.pixels[idx..idx + 4].copy_from_slice(&[0, 0, 0, 0]);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    /// Create a test bitmap where each pixel has a unique value based on
    /// position.
    fn test_bitmap(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Bitmap::new(width, height, pixels)
    }

    fn description(rect: Rect) -> CropDescription {
        CropDescription {
            rect,
            rotation_angle: 0.0,
            zoom_scale: 1.0,
        }
    }

    #[test]
    fn test_full_rect_crop_is_identity() {
        let bmp = test_bitmap(50, 50);
        let desc = description(Rect::new(0.0, 0.0, 50.0, 50.0));

        let result = crop_bitmap(&bmp, &desc, false, None, Interpolation::Bilinear).unwrap();
        assert_eq!(result, bmp);
    }

    #[test]
    fn test_sub_rect_crop() {
        let bmp = test_bitmap(10, 10);
        let desc = description(Rect::new(3.0, 3.0, 4.0, 4.0));

        let result = crop_bitmap(&bmp, &desc, false, None, Interpolation::Bilinear).unwrap();
        assert_eq!(result.width, 4);
        assert_eq!(result.height, 4);

        // First pixel comes from (3, 3): value = 3 * 10 + 3 = 33
        assert_eq!(result.pixel(0, 0)[0], 33);
    }

    #[test]
    fn test_sub_pixel_rect_rounds_to_nearest() {
        let bmp = test_bitmap(10, 10);
        // (2.6, 2.6) .. (6.4, 6.4) rounds to (3, 3) .. (6, 6)
        let desc = description(Rect::new(2.6, 2.6, 3.8, 3.8));

        let result = crop_bitmap(&bmp, &desc, false, None, Interpolation::Bilinear).unwrap();
        assert_eq!(result.width, 3);
        assert_eq!(result.height, 3);
        assert_eq!(result.pixel(0, 0)[0], 33);
    }

    #[test]
    fn test_rect_partially_outside_is_clamped() {
        let bmp = test_bitmap(10, 10);
        let desc = description(Rect::new(-5.0, -5.0, 10.0, 10.0));

        let result = crop_bitmap(&bmp, &desc, false, None, Interpolation::Bilinear).unwrap();
        assert_eq!(result.width, 5);
        assert_eq!(result.height, 5);
        assert_eq!(result.pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_rect_fully_outside_errors() {
        let bmp = test_bitmap(10, 10);
        let desc = description(Rect::new(100.0, 100.0, 10.0, 10.0));

        let result = crop_bitmap(&bmp, &desc, false, None, Interpolation::Bilinear);
        assert!(matches!(result, Err(CropError::ExtractionOutOfBounds)));
    }

    #[test]
    fn test_zero_size_rect_errors() {
        let bmp = test_bitmap(10, 10);
        let desc = description(Rect::new(5.0, 5.0, 0.0, 0.0));

        let result = crop_bitmap(&bmp, &desc, false, None, Interpolation::Bilinear);
        assert!(matches!(result, Err(CropError::ExtractionOutOfBounds)));
    }

    #[test]
    fn test_quarter_turn_crop_dimensions() {
        let bmp = test_bitmap(40, 20);
        let desc = CropDescription {
            rect: Rect::new(0.0, 0.0, 40.0, 20.0),
            rotation_angle: FRAC_PI_2,
            zoom_scale: 1.0,
        };

        // Rotating the full bitmap a quarter turn and cropping the remapped
        // full rect yields the swapped dimensions.
        let result = crop_bitmap(&bmp, &desc, false, None, Interpolation::Bilinear).unwrap();
        assert_eq!(result.width, 20);
        assert_eq!(result.height, 40);
    }

    #[test]
    fn test_rotated_crop_expands_rect_to_bounding_box() {
        let bmp = test_bitmap(100, 100);
        let desc = CropDescription {
            rect: Rect::new(30.0, 30.0, 40.0, 40.0),
            rotation_angle: FRAC_PI_2 / 2.0,
            zoom_scale: 1.0,
        };

        let result = crop_bitmap(&bmp, &desc, false, None, Interpolation::Bilinear).unwrap();

        // The axis-aligned bounding box of a 40x40 rect rotated 45 degrees
        // has side ~56.6, rounded to nearest pixel bounds.
        assert!((result.width as i64 - 57).abs() <= 1, "width {}", result.width);
        assert!((result.height as i64 - 57).abs() <= 1, "height {}", result.height);
    }

    #[test]
    fn test_mask_applied_clears_outside_alpha() {
        let bmp = test_bitmap(20, 20);
        let desc = description(Rect::new(0.0, 0.0, 20.0, 20.0));
        let mask = OutlinePath::ellipse_in_rect(Rect::new(0.0, 0.0, 20.0, 20.0));

        let result =
            crop_bitmap(&bmp, &desc, true, Some(&mask), Interpolation::Bilinear).unwrap();

        // Corners fall outside the inscribed ellipse
        assert_eq!(result.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(result.pixel(19, 0), [0, 0, 0, 0]);
        assert_eq!(result.pixel(0, 19), [0, 0, 0, 0]);
        assert_eq!(result.pixel(19, 19), [0, 0, 0, 0]);

        // Center survives untouched
        assert_eq!(result.pixel(10, 10)[3], 255);
    }

    #[test]
    fn test_mask_fitted_from_its_own_space() {
        // Path in mask-space coordinates far from the bitmap origin still
        // clips correctly after fitting.
        let bmp = test_bitmap(20, 20);
        let desc = description(Rect::new(0.0, 0.0, 20.0, 20.0));
        let mask = OutlinePath::ellipse_in_rect(Rect::new(300.0, 500.0, 80.0, 80.0));

        let result =
            crop_bitmap(&bmp, &desc, true, Some(&mask), Interpolation::Bilinear).unwrap();
        assert_eq!(result.pixel(0, 0)[3], 0);
        assert_eq!(result.pixel(10, 10)[3], 255);
    }

    #[test]
    fn test_apply_mask_without_path_is_rectangular() {
        let bmp = test_bitmap(10, 10);
        let desc = description(Rect::new(0.0, 0.0, 10.0, 10.0));

        let result = crop_bitmap(&bmp, &desc, true, None, Interpolation::Bilinear).unwrap();
        assert_eq!(result, bmp);
    }

    #[test]
    fn test_mask_with_empty_bounds_is_degenerate() {
        let bmp = test_bitmap(10, 10);
        let desc = description(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mask = OutlinePath { segments: vec![] };

        let result = crop_bitmap(&bmp, &desc, true, Some(&mask), Interpolation::Bilinear);
        assert!(matches!(result, Err(CropError::DegenerateGeometry(_))));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
