//! Geometric primitives for force-directed layouts.
//!
//! This module provides the small set of geometric types the layout engine
//! needs to integrate node motion and to describe the finished layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate, also used as a displacement, velocity, or force vector
//! - [`Bounds`] - An axis-aligned bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Relaymap uses a coordinate system consistent with SVG and canvas renderers:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The engine itself has no notion of a viewport; the configured center is the
//! only absolute reference the simulation pulls toward.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// A 2D point in layout coordinate space.
///
/// Points use `f64` coordinates. The same type doubles as a vector for
/// velocities and forces, which keeps the integrator arithmetic uniform.
///
/// # Examples
///
/// ```
/// # use relaymap_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// assert_eq!(p1.distance(p2), p1.sub_point(p2).hypot());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the unit vector pointing at `angle` radians from the +X axis.
    ///
    /// # Examples
    ///
    /// ```
    /// # use relaymap_core::geometry::Point;
    /// let unit = Point::from_angle(0.0);
    /// assert_eq!(unit.x(), 1.0);
    /// assert_eq!(unit.y(), 0.0);
    /// ```
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { x: cos, y: sin }
    }

    /// Returns the unit vector for a fraction of a full turn.
    ///
    /// `turns` is expected in `[0, 1)`; values outside wrap around.
    pub fn from_turns(turns: f64) -> Self {
        Self::from_angle(turns * TAU)
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Checks that neither coordinate is NaN or infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean length of the vector)
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Squared Euclidean length; avoids the square root for energy sums
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        other.sub_point(self).hypot()
    }

    /// Multiplies both coordinates by the given factor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use relaymap_core::geometry::Point;
    /// let point = Point::new(10.0, 20.0);
    ///
    /// let doubled = point.scale(2.0);
    /// assert_eq!(doubled.x(), 20.0);
    /// assert_eq!(doubled.y(), 40.0);
    /// ```
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the point negated in both coordinates
    pub fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// An axis-aligned rectangle with minimum and maximum coordinates.
///
/// Built by folding points into it, starting from a single point; there is
/// no empty bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates a zero-sized bounds at a single point
    pub fn from_point(point: Point) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }

    /// Builds the smallest bounds containing every point, or `None` for no points.
    ///
    /// # Examples
    ///
    /// ```
    /// # use relaymap_core::geometry::{Bounds, Point};
    /// let bounds = Bounds::from_points([Point::new(0.0, 5.0), Point::new(10.0, -5.0)]).unwrap();
    /// assert_eq!(bounds.width(), 10.0);
    /// assert_eq!(bounds.height(), 10.0);
    /// assert_eq!(bounds.center(), Point::new(5.0, 0.0));
    ///
    /// assert!(Bounds::from_points(std::iter::empty()).is_none());
    /// ```
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = Self::from_point(points.next()?);
        Some(points.fold(first, Self::include))
    }

    /// Returns the bounds grown to contain `point`
    pub fn include(self, point: Point) -> Self {
        Self {
            min_x: self.min_x.min(point.x),
            min_y: self.min_y.min(point.y),
            max_x: self.max_x.max(point.x),
            max_y: self.max_y.max(point.y),
        }
    }

    /// Merges two bounds into the smallest bounds containing both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the bounds grown by `margin` on every side
    pub fn expand(self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert!(point.is_zero());
    }

    #[test]
    fn test_point_hypot() {
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
        assert_eq!(Point::new(3.0, 4.0).length_squared(), 25.0);
        assert_eq!(Point::default().hypot(), 0.0);
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, -2.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_point_from_turns() {
        let quarter = Point::from_turns(0.25);
        assert!(quarter.x().abs() < 1e-12);
        assert!((quarter.y() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_neg() {
        assert_eq!(Point::new(1.0, -2.0).neg(), Point::new(-1.0, 2.0));
    }

    #[test]
    fn test_bounds_include_and_expand() {
        let bounds = Bounds::from_point(Point::new(1.0, 1.0))
            .include(Point::new(-1.0, 3.0))
            .expand(1.0);
        assert_eq!(bounds.min_x(), -2.0);
        assert_eq!(bounds.min_y(), 0.0);
        assert_eq!(bounds.max_x(), 2.0);
        assert_eq!(bounds.max_y(), 4.0);
    }

    #[test]
    fn test_bounds_merge() {
        let a = Bounds::from_point(Point::new(0.0, 0.0));
        let b = Bounds::from_point(Point::new(10.0, 20.0));
        let merged = a.merge(&b);
        assert_eq!(merged.width(), 10.0);
        assert_eq!(merged.height(), 20.0);
    }
}
