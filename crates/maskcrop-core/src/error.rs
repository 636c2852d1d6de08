//! Error types for crop geometry and transform operations.

use thiserror::Error;

/// Error types for crop engine operations.
///
/// Every failure stems from invalid input state rather than a transient
/// condition, so no operation is retried. All errors propagate synchronously
/// to the caller of the failing operation.
#[derive(Debug, Error)]
pub enum CropError {
    /// The target pixel buffer could not be sized or allocated.
    #[error("Failed to create bitmap: {0}")]
    BitmapCreation(String),

    /// A custom geometry provider returned geometry that violates the
    /// containment invariants. Treat as a configuration bug on the caller
    /// side and halt the interaction.
    #[error("Invalid custom geometry: {0}")]
    InvalidCustomGeometry(String),

    /// Zero-area mask, non-positive zoom, or empty content size. Should
    /// never occur when the resolvers are given valid input; checked as a
    /// precondition so upstream bugs surface instead of producing NaNs.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The rounded crop rect has zero width or height after clamping to
    /// the bitmap bounds.
    #[error("Crop rect is empty after rounding and clamping to the bitmap bounds")]
    ExtractionOutOfBounds,
}
