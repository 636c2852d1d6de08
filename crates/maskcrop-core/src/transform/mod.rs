//! Bitmap transformation operations: rotation and crop extraction.
//!
//! These are the only operations in the engine with non-trivial cost
//! (proportional to pixel count). They run once per commit action and are
//! never invoked speculatively during live interaction.
//!
//! # Coordinate System
//!
//! - Rotation angles are in radians, positive = clockwise (y-down screen
//!   coordinates)
//! - Crop rects are in source-bitmap pixel space
//! - Origin is the top-left corner

mod crop;
mod rotate;

pub use crop::crop_bitmap;
pub use rotate::{compute_rotated_bounds, rotate_bitmap, Interpolation};
