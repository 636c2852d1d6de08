//! Bitmap rotation with bilinear and Lanczos3 interpolation.
//!
//! The rotation uses inverse mapping: for each pixel in the output canvas,
//! we calculate which source pixel(s) contribute to it and interpolate
//! their values. The canvas is sized to the axis-aligned bounding box of
//! the rotated source, and pixels outside the rotated footprint stay fully
//! transparent.
//!
//! Angles are in radians; positive rotates clockwise in y-down screen
//! coordinates.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::bitmap::Bitmap;

/// Angle tolerance below which a rotation is treated as a no-op or snapped
/// to an exact quarter turn for bounds computation.
const ANGLE_EPSILON: f64 = 1e-6;

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Fast bilinear interpolation - good for preview rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// Compute the dimensions of the bounding box for a rotated bitmap.
///
/// When a bitmap is rotated the corners extend beyond the original bounds;
/// this returns the minimum canvas that contains the entire rotated image.
/// Exact quarter turns take a fast path so 90/270 degree rotations swap
/// dimensions without float rounding.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_radians: f64) -> (u32, u32) {
    let angle = angle_radians.rem_euclid(TAU);

    // Fast paths: no-op and exact quarter turns
    if angle < ANGLE_EPSILON || TAU - angle < ANGLE_EPSILON {
        return (width, height);
    }
    if (angle - FRAC_PI_2).abs() < ANGLE_EPSILON || (angle - 3.0 * FRAC_PI_2).abs() < ANGLE_EPSILON
    {
        return (height, width);
    }
    if (angle - PI).abs() < ANGLE_EPSILON {
        return (width, height);
    }

    let cos = angle.cos().abs();
    let sin = angle.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // The bounding box of a rotated rectangle is:
    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate a bitmap clockwise around its center by the angle, in radians.
///
/// The output canvas is expanded to fit the entire rotated image; the area
/// outside the rotated footprint is fully transparent. Rotation by 0 (or
/// any multiple of 2π) returns an equivalent bitmap.
pub fn rotate_bitmap(bitmap: &Bitmap, angle_radians: f64, filter: Interpolation) -> Bitmap {
    let angle = angle_radians.rem_euclid(TAU);

    // Fast path: no rotation needed
    if angle < ANGLE_EPSILON || TAU - angle < ANGLE_EPSILON {
        return bitmap.clone();
    }

    let (src_w, src_h) = (bitmap.width as f64, bitmap.height as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(bitmap.width, bitmap.height, angle);

    // Inverse of a clockwise rotation in y-down coordinates
    let cos = angle.cos();
    let sin = angle.sin();

    // Center of source and destination canvases
    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = vec![0u8; dst_w as usize * dst_h as usize * 4];

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Translate destination point to origin at center
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Apply inverse rotation to find source coordinates
            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            let dst_idx = (dst_y as usize * dst_w as usize + dst_x as usize) * 4;

            // Sample pixel using the specified interpolation
            let pixel = match filter {
                Interpolation::Bilinear => sample_bilinear(bitmap, src_x, src_y),
                Interpolation::Lanczos3 => sample_lanczos3(bitmap, src_x, src_y),
            };

            output[dst_idx..dst_idx + 4].copy_from_slice(&pixel);
        }
    }

    Bitmap::new(dst_w, dst_h, output)
}

/// Get a pixel as [f64; 4] from a bitmap at the given coordinates.
#[inline]
fn get_pixel_f64(bitmap: &Bitmap, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * bitmap.width as usize + px) * 4;
    [
        bitmap.pixels[idx] as f64,
        bitmap.pixels[idx + 1] as f64,
        bitmap.pixels[idx + 2] as f64,
        bitmap.pixels[idx + 3] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation.
///
/// Considers the 4 nearest pixels and weights their contribution based on
/// distance. Out-of-bounds samples are fully transparent.
fn sample_bilinear(bitmap: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (bitmap.width as i64, bitmap.height as i64);

    if x < 0.0 || x > (w - 1) as f64 || y < 0.0 || y > (h - 1) as f64 {
        return [0, 0, 0, 0];
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(w as usize - 1);
    let y1 = (y0 + 1).min(h as usize - 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(bitmap, x0, y0);
    let p10 = get_pixel_f64(bitmap, x1, y0);
    let p01 = get_pixel_f64(bitmap, x0, y1);
    let p11 = get_pixel_f64(bitmap, x1, y1);

    // Bilinear interpolation formula
    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Considers a 6x6 neighborhood, providing higher quality results
/// especially for sharp edges. Falls back to bilinear near the borders
/// where the kernel would not fit.
fn sample_lanczos3(bitmap: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (bitmap.width as i64, bitmap.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(bitmap, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    // Sample 6x6 neighborhood
    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            if px >= 0 && px < w && py >= 0 && py < h {
                let dx = x - px as f64;
                let dy = y - py as f64;
                let weight = lanczos_weight(dx, 3.0) * lanczos_weight(dy, 3.0);

                let pixel = get_pixel_f64(bitmap, px as usize, py as usize);
                for i in 0..4 {
                    sum[i] += pixel[i] * weight;
                }
                weight_sum += weight;
            }
        }
    }

    let mut result = [0u8; 4];
    if weight_sum > 0.0 {
        for i in 0..4 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
///
/// where sinc(x) = sin(πx) / (πx)
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
