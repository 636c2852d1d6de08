//! Mask geometry and movement bounds resolution.
//!
//! Given a crop mode and the container the mask lives in, these resolvers
//! produce the fixed mask rectangle/outline and the rectangle within which
//! the image content may be panned. Both are pure functions, safe to call
//! on every layout pass.
//!
//! The container rect is the visible canvas with any surrounding chrome
//! (title label above, control buttons below) already subtracted by the
//! caller; the engine never reasons about presentation layout.

use crate::error::CropError;
use crate::geometry::{OutlinePath, Rect};
use crate::CropConfig;

/// Geometry provider for [`CropMode::Custom`].
///
/// Implemented by the presentation layer when the built-in circle/square
/// shapes do not fit. The engine borrows the provider per call and holds no
/// long-lived reference to it.
pub trait CustomGeometryProvider {
    /// The rect of the mask within the container.
    fn mask_rect(&self, container: Rect) -> Rect;

    /// The outline path of the mask, in the same space as `mask_rect`.
    fn mask_path(&self, mask_rect: Rect) -> OutlinePath;

    /// The rect within which the image content may be moved.
    /// Must contain `mask_rect`.
    fn movement_rect(&self, mask_rect: Rect, container: Rect) -> Rect;
}

/// The crop shape the user frames the image into.
///
/// Circle and Square are built in. Custom carries its geometry provider in
/// the variant itself, so selecting custom mode without a provider is
/// unrepresentable rather than a runtime check.
#[derive(Clone, Copy)]
pub enum CropMode<'a> {
    Circle,
    Square,
    Custom(&'a dyn CustomGeometryProvider),
}

impl std::fmt::Debug for CropMode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropMode::Circle => f.write_str("Circle"),
            CropMode::Square => f.write_str("Square"),
            CropMode::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Resolve the mask rect and outline path for the given mode.
///
/// Circle and Square share the rect derivation: the largest square centered
/// in `container`, inset by the per-orientation edge inset for the mode.
/// They differ only in inset magnitude and outline shape (inscribed ellipse
/// vs. the rect itself).
///
/// # Errors
///
/// - `DegenerateGeometry` if the insets leave no room for the mask.
/// - `InvalidCustomGeometry` if a custom provider returns an empty rect or
///   one not contained in `container`.
pub fn resolve_mask(
    mode: &CropMode<'_>,
    container: Rect,
    is_portrait: bool,
    config: &CropConfig,
) -> Result<(Rect, OutlinePath), CropError> {
    match mode {
        CropMode::Circle => {
            let inset = if is_portrait {
                config.portrait_circle_inset
            } else {
                config.landscape_circle_inset
            };
            let rect = centered_square(container, inset)?;
            Ok((rect, OutlinePath::ellipse_in_rect(rect)))
        }
        CropMode::Square => {
            let inset = if is_portrait {
                config.portrait_square_inset
            } else {
                config.landscape_square_inset
            };
            let rect = centered_square(container, inset)?;
            Ok((rect, OutlinePath::rect(rect)))
        }
        CropMode::Custom(provider) => {
            let rect = provider.mask_rect(container);
            if rect.is_empty() {
                return Err(CropError::InvalidCustomGeometry(
                    "custom mask rect is empty".to_string(),
                ));
            }
            if !container.contains_rect(&rect) {
                return Err(CropError::InvalidCustomGeometry(format!(
                    "custom mask rect {rect:?} is not contained in container {container:?}"
                )));
            }
            let path = provider.mask_path(rect);
            Ok((rect, path))
        }
    }
}

/// Resolve the rect within which the image content may be panned so the
/// mask stays fully covered.
///
/// For Circle and Square the image may be panned anywhere within the
/// container while the mask stays fixed. Custom mode delegates to the
/// provider.
///
/// # Errors
///
/// `InvalidCustomGeometry` if a custom provider returns a movement rect
/// that does not contain `mask_rect`. The check runs before any pixel
/// operation can occur.
pub fn resolve_movement_rect(
    mode: &CropMode<'_>,
    mask_rect: Rect,
    container: Rect,
) -> Result<Rect, CropError> {
    match mode {
        CropMode::Circle | CropMode::Square => Ok(container),
        CropMode::Custom(provider) => {
            let rect = provider.movement_rect(mask_rect, container);
            if !rect.contains_rect(&mask_rect) {
                return Err(CropError::InvalidCustomGeometry(format!(
                    "custom movement rect {rect:?} does not contain mask rect {mask_rect:?}"
                )));
            }
            Ok(rect)
        }
    }
}

/// Largest square centered in `container`, shrunk by `inset` on each edge.
fn centered_square(container: Rect, inset: f64) -> Result<Rect, CropError> {
    let side = container.width().min(container.height()) - 2.0 * inset;
    if side <= 0.0 {
        return Err(CropError::DegenerateGeometry(format!(
            "inset {inset} leaves no room for a mask in {container:?}"
        )));
    }
    Ok(Rect::new(
        container.min_x() + (container.width() - side) / 2.0,
        container.min_y() + (container.height() - side) / 2.0,
        side,
        side,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    struct FixedProvider {
        mask: Rect,
        movement: Rect,
    }

    impl CustomGeometryProvider for FixedProvider {
        fn mask_rect(&self, _container: Rect) -> Rect {
            self.mask
        }

        fn mask_path(&self, mask_rect: Rect) -> OutlinePath {
            OutlinePath::rect(mask_rect)
        }

        fn movement_rect(&self, _mask_rect: Rect, _container: Rect) -> Rect {
            self.movement
        }
    }

    #[test]
    fn test_circle_portrait_default_insets() {
        // 400x700 portrait container with the default 15.0 circle inset:
        // side = 400 - 30 = 370, centered at x = 15, y = (700 - 370) / 2
        let container = Rect::new(0.0, 0.0, 400.0, 700.0);
        let config = CropConfig::default();

        let (rect, path) =
            resolve_mask(&CropMode::Circle, container, true, &config).unwrap();
        assert_eq!(rect, Rect::new(15.0, 165.0, 370.0, 370.0));

        // The outline is an ellipse inscribed in the rect
        assert!(path.contains_point(rect.center()));
        assert!(!path.contains_point(Point::new(rect.min_x() + 1.0, rect.min_y() + 1.0)));
    }

    #[test]
    fn test_square_portrait_default_insets() {
        let container = Rect::new(0.0, 0.0, 400.0, 700.0);
        let config = CropConfig::default();

        let (rect, path) =
            resolve_mask(&CropMode::Square, container, true, &config).unwrap();
        assert_eq!(rect, Rect::new(20.0, 170.0, 360.0, 360.0));

        // The outline is the rect itself, corners included
        assert!(path.contains_point(Point::new(rect.min_x() + 1.0, rect.min_y() + 1.0)));
    }

    #[test]
    fn test_landscape_insets() {
        let container = Rect::new(0.0, 0.0, 700.0, 400.0);
        let config = CropConfig::default();

        // Landscape circle inset defaults to 45.0: side = 400 - 90 = 310
        let (rect, _) = resolve_mask(&CropMode::Circle, container, false, &config).unwrap();
        assert_eq!(rect, Rect::new(195.0, 45.0, 310.0, 310.0));
    }

    #[test]
    fn test_mask_rect_square_centered_and_contained() {
        let container = Rect::new(10.0, 30.0, 380.0, 600.0);
        let config = CropConfig::default();

        for mode in [CropMode::Circle, CropMode::Square] {
            for is_portrait in [true, false] {
                let (rect, _) = resolve_mask(&mode, container, is_portrait, &config).unwrap();
                assert_eq!(rect.width(), rect.height(), "mask rect must be square");
                assert!(container.contains_rect(&rect));
                assert_eq!(rect.center().x, container.center().x);
                assert_eq!(rect.center().y, container.center().y);
            }
        }
    }

    #[test]
    fn test_degenerate_container() {
        let container = Rect::new(0.0, 0.0, 20.0, 20.0);
        let config = CropConfig::default();

        let result = resolve_mask(&CropMode::Circle, container, false, &config);
        assert!(matches!(result, Err(CropError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_movement_rect_builtin_modes() {
        let container = Rect::new(0.0, 0.0, 400.0, 700.0);
        let mask = Rect::new(15.0, 165.0, 370.0, 370.0);

        let rect = resolve_movement_rect(&CropMode::Circle, mask, container).unwrap();
        assert_eq!(rect, container);

        let rect = resolve_movement_rect(&CropMode::Square, mask, container).unwrap();
        assert_eq!(rect, container);
    }

    #[test]
    fn test_custom_mask_ok() {
        let provider = FixedProvider {
            mask: Rect::new(50.0, 50.0, 100.0, 80.0),
            movement: Rect::new(0.0, 0.0, 400.0, 700.0),
        };
        let container = Rect::new(0.0, 0.0, 400.0, 700.0);
        let mode = CropMode::Custom(&provider);

        let (rect, _) = resolve_mask(&mode, container, true, &CropConfig::default()).unwrap();
        assert_eq!(rect, Rect::new(50.0, 50.0, 100.0, 80.0));

        let movement = resolve_movement_rect(&mode, rect, container).unwrap();
        assert!(movement.contains_rect(&rect));
    }

    #[test]
    fn test_custom_mask_outside_container() {
        let provider = FixedProvider {
            mask: Rect::new(350.0, 650.0, 100.0, 100.0),
            movement: Rect::new(0.0, 0.0, 400.0, 700.0),
        };
        let container = Rect::new(0.0, 0.0, 400.0, 700.0);

        let result = resolve_mask(
            &CropMode::Custom(&provider),
            container,
            true,
            &CropConfig::default(),
        );
        assert!(matches!(result, Err(CropError::InvalidCustomGeometry(_))));
    }

    #[test]
    fn test_custom_empty_mask() {
        let provider = FixedProvider {
            mask: Rect::new(50.0, 50.0, 0.0, 0.0),
            movement: Rect::new(0.0, 0.0, 400.0, 700.0),
        };
        let container = Rect::new(0.0, 0.0, 400.0, 700.0);

        let result = resolve_mask(
            &CropMode::Custom(&provider),
            container,
            true,
            &CropConfig::default(),
        );
        assert!(matches!(result, Err(CropError::InvalidCustomGeometry(_))));
    }

    #[test]
    fn test_custom_movement_rect_must_contain_mask() {
        let provider = FixedProvider {
            mask: Rect::new(50.0, 50.0, 100.0, 100.0),
            movement: Rect::new(60.0, 60.0, 50.0, 50.0),
        };
        let container = Rect::new(0.0, 0.0, 400.0, 700.0);
        let mode = CropMode::Custom(&provider);

        let (mask_rect, _) =
            resolve_mask(&mode, container, true, &CropConfig::default()).unwrap();
        let result = resolve_movement_rect(&mode, mask_rect, container);
        assert!(matches!(result, Err(CropError::InvalidCustomGeometry(_))));
    }
}
