//! Plane geometry shared by the board generator, the jump test and the
//! rotation view.
//!
//! Coordinates are canvas units on a 600×600 layout with the y axis pointing
//! down. Every board is centred on (300, 300).

use serde::{Deserialize, Serialize};

/// Tolerance for both the collinearity cross product and the distance-sum
/// check in [`is_collinear_and_between`].
pub const COLLINEAR_TOLERANCE: f64 = 10.0;

/// Pivot for quarter-turn arm generation and for the rotation view.
pub const BOARD_CENTER: Point = Point::new(300.0, 300.0);

/// A point on the board layout.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Rotate about `center` by `angle` radians (clockwise on screen, since y
    /// grows downwards).
    pub fn rotate_about(self, center: Point, angle: f64) -> Point {
        let tx = self.x - center.x;
        let ty = self.y - center.y;
        let (sin, cos) = angle.sin_cos();
        Point::new(tx * cos - ty * sin + center.x, tx * sin + ty * cos + center.y)
    }

    /// Rotate about `center` by `turns` quarter turns.
    ///
    /// Same direction as [`Point::rotate_about`] with `turns * π/2`, but
    /// computed by swapping offsets so the result carries no trigonometric
    /// rounding.
    pub fn quarter_turn(self, center: Point, turns: u8) -> Point {
        let tx = self.x - center.x;
        let ty = self.y - center.y;
        let (rx, ry) = match turns % 4 {
            0 => (tx, ty),
            1 => (-ty, tx),
            2 => (-tx, -ty),
            _ => (ty, -tx),
        };
        Point::new(rx + center.x, ry + center.y)
    }
}

/// Whether `b` lies on the straight segment from `a` to `c`.
///
/// Both the cross product of `ab × ac` and the slack in
/// `|ab| + |bc| - |ac|` must stay inside [`COLLINEAR_TOLERANCE`].
pub fn is_collinear_and_between(a: Point, b: Point, c: Point) -> bool {
    let cross = ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs();
    if cross > COLLINEAR_TOLERANCE {
        return false;
    }
    let slack = a.distance(b) + b.distance(c) - a.distance(c);
    slack.abs() < COLLINEAR_TOLERANCE
}
