//! 2D geometry primitives: points, sizes, rects, and outline paths.
//!
//! All coordinates use double-precision floats. Rects are axis-aligned and
//! never carry negative dimensions. Which coordinate space a value lives in
//! (container, mask, content, or source-image pixels) is a documentation
//! contract on each operation rather than a type-level distinction.

use serde::{Deserialize, Serialize};

/// Cubic Bezier circle approximation constant: 4/3 * (sqrt(2) - 1).
pub const ELLIPSE_BEZIER_K: f64 = 0.552_284_749_830_793_4;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D size. Dimensions are expected to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// True if either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.w * self.h
        }
    }
}

/// An axis-aligned rectangle (origin + size).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(w, h),
        }
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.w
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.h
    }

    pub fn width(&self) -> f64 {
        self.size.w
    }

    pub fn height(&self) -> f64 {
        self.size.h
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.w / 2.0,
            self.origin.y + self.size.h / 2.0,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    pub fn area(&self) -> f64 {
        self.size.area()
    }

    /// True if `other` lies entirely within this rect (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// True if the point lies within this rect (edges inclusive).
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// Shrink the rect by `dx` on the left/right edges and `dy` on the
    /// top/bottom edges. Collapses to an empty rect at the center when the
    /// insets exceed the available size.
    pub fn inset_by(&self, dx: f64, dy: f64) -> Rect {
        let w = self.size.w - 2.0 * dx;
        let h = self.size.h - 2.0 * dy;
        if w <= 0.0 || h <= 0.0 {
            let c = self.center();
            return Rect::new(c.x, c.y, 0.0, 0.0);
        }
        Rect::new(self.origin.x + dx, self.origin.y + dy, w, h)
    }

    /// Intersection of two rects. Returns an empty rect when they are
    /// disjoint.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x0 = self.min_x().max(other.min_x());
        let y0 = self.min_y().max(other.min_y());
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        if x1 <= x0 || y1 <= y0 {
            return Rect::new(x0, y0, 0.0, 0.0);
        }
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// A single segment of an outline path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Start a new subpath at the point.
    MoveTo(Point),
    /// Straight line to the point.
    LineTo(Point),
    /// Cubic Bezier curve to `to` with control points `c1` and `c2`.
    CubicTo { c1: Point, c2: Point, to: Point },
    /// Close the current subpath back to its starting point.
    Close,
}

/// An ordered sequence of closed subpaths defining a fillable region.
///
/// Used for circle, square, and custom mask outlines. Containment queries
/// use the even-odd fill rule with cubic segments flattened to polylines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlinePath {
    pub segments: Vec<PathSegment>,
}

/// Number of line segments each cubic Bezier is flattened into for
/// containment tests. Sub-pixel accurate for mask-sized curves.
const CUBIC_FLATTEN_STEPS: usize = 16;

impl OutlinePath {
    /// A rectangular outline.
    pub fn rect(rect: Rect) -> Self {
        Self {
            segments: vec![
                PathSegment::MoveTo(Point::new(rect.min_x(), rect.min_y())),
                PathSegment::LineTo(Point::new(rect.max_x(), rect.min_y())),
                PathSegment::LineTo(Point::new(rect.max_x(), rect.max_y())),
                PathSegment::LineTo(Point::new(rect.min_x(), rect.max_y())),
                PathSegment::Close,
            ],
        }
    }

    /// An ellipse inscribed in `rect`, built from four cubic Bezier arcs.
    pub fn ellipse_in_rect(rect: Rect) -> Self {
        let c = rect.center();
        let rx = rect.width() / 2.0;
        let ry = rect.height() / 2.0;
        let kx = rx * ELLIPSE_BEZIER_K;
        let ky = ry * ELLIPSE_BEZIER_K;

        Self {
            segments: vec![
                PathSegment::MoveTo(Point::new(c.x + rx, c.y)),
                PathSegment::CubicTo {
                    c1: Point::new(c.x + rx, c.y + ky),
                    c2: Point::new(c.x + kx, c.y + ry),
                    to: Point::new(c.x, c.y + ry),
                },
                PathSegment::CubicTo {
                    c1: Point::new(c.x - kx, c.y + ry),
                    c2: Point::new(c.x - rx, c.y + ky),
                    to: Point::new(c.x - rx, c.y),
                },
                PathSegment::CubicTo {
                    c1: Point::new(c.x - rx, c.y - ky),
                    c2: Point::new(c.x - kx, c.y - ry),
                    to: Point::new(c.x, c.y - ry),
                },
                PathSegment::CubicTo {
                    c1: Point::new(c.x + kx, c.y - ry),
                    c2: Point::new(c.x + rx, c.y - ky),
                    to: Point::new(c.x + rx, c.y),
                },
                PathSegment::Close,
            ],
        }
    }

    /// Axis-aligned bounding box over all on-path and control points.
    /// Conservative for cubics (control points may lie outside the curve),
    /// which is acceptable for fitting a mask path onto a bitmap.
    pub fn bounding_rect(&self) -> Rect {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        let mut visit = |p: Point| {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        };

        for segment in &self.segments {
            match segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => visit(*p),
                PathSegment::CubicTo { c1, c2, to } => {
                    visit(*c1);
                    visit(*c2);
                    visit(*to);
                }
                PathSegment::Close => {}
            }
        }

        if min_x > max_x || min_y > max_y {
            return Rect::default();
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Apply a per-axis scale followed by a translation to every point.
    pub fn transformed(&self, scale_x: f64, scale_y: f64, tx: f64, ty: f64) -> Self {
        let map = |p: Point| Point::new(p.x * scale_x + tx, p.y * scale_y + ty);
        let segments = self
            .segments
            .iter()
            .map(|segment| match segment {
                PathSegment::MoveTo(p) => PathSegment::MoveTo(map(*p)),
                PathSegment::LineTo(p) => PathSegment::LineTo(map(*p)),
                PathSegment::CubicTo { c1, c2, to } => PathSegment::CubicTo {
                    c1: map(*c1),
                    c2: map(*c2),
                    to: map(*to),
                },
                PathSegment::Close => PathSegment::Close,
            })
            .collect();
        Self { segments }
    }

    /// Flatten all subpaths into closed polylines for containment testing.
    pub(crate) fn flattened(&self) -> Vec<Vec<Point>> {
        let mut polylines: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();

        for segment in &self.segments {
            match segment {
                PathSegment::MoveTo(p) => {
                    if current.len() > 1 {
                        polylines.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                    current.push(*p);
                }
                PathSegment::LineTo(p) => current.push(*p),
                PathSegment::CubicTo { c1, c2, to } => {
                    let from = match current.last() {
                        Some(p) => *p,
                        None => continue,
                    };
                    for i in 1..=CUBIC_FLATTEN_STEPS {
                        let t = i as f64 / CUBIC_FLATTEN_STEPS as f64;
                        current.push(cubic_point(from, *c1, *c2, *to, t));
                    }
                }
                PathSegment::Close => {
                    if current.len() > 1 {
                        polylines.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
            }
        }

        if current.len() > 1 {
            polylines.push(current);
        }
        polylines
    }

    /// Even-odd containment test against the flattened outline.
    pub fn contains_point(&self, p: Point) -> bool {
        polylines_contain(&self.flattened(), p)
    }
}

/// Evaluate a cubic Bezier at parameter `t`.
fn cubic_point(p0: Point, c1: Point, c2: Point, p1: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let x = u * u * u * p0.x + 3.0 * u * u * t * c1.x + 3.0 * u * t * t * c2.x + t * t * t * p1.x;
    let y = u * u * u * p0.y + 3.0 * u * u * t * c1.y + 3.0 * u * t * t * c2.y + t * t * t * p1.y;
    Point::new(x, y)
}

/// Even-odd point-in-polygon test over a set of closed polylines.
pub(crate) fn polylines_contain(polylines: &[Vec<Point>], p: Point) -> bool {
    let mut inside = false;
    for polyline in polylines {
        let n = polyline.len();
        for i in 0..n {
            let a = polyline[i];
            let b = polyline[(i + 1) % n];
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
    }
    inside
}
