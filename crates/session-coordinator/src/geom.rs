// Screen-space geometry used for pointer classification.
// Coordinates are global display points with f64 fields, matching CoreGraphics.

use serde::Deserialize;

/// A location on the global screen plane.
#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with origin at `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize)]
pub struct Rect {
    /// Origin x.
    pub x: f64,
    /// Origin y.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Minimum x.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Maximum x.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Minimum y.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y
    }

    /// Maximum y.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y + self.h
    }

    /// True when `p` lies inside the rectangle. The near edges are inclusive,
    /// the far edges exclusive, so adjacent rectangles never both claim a point.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.bottom() && p.y < self.top()
    }
}
