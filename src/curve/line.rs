use std::fmt;

use nalgebra::{Point2, Vector2};

use crate::misc::{distance_squared, FloatingPoint};

use super::{ParametricCurve, Rectangle};

/// A straight segment from `start` (t = 0) to `end` (t = 1).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line<T: FloatingPoint> {
    start: Point2<T>,
    end: Point2<T>,
}

impl<T: FloatingPoint> Line<T> {
    pub fn new(start: Point2<T>, end: Point2<T>) -> Self {
        Self { start, end }
    }

    /// Create a vertical line from `top` down to the x axis.
    /// # Example
    /// ```
    /// use nalgebra::Point2;
    /// use parasolv::prelude::*;
    ///
    /// let bar = Line::histogram(Point2::new(3., 7.));
    /// assert_eq!(bar.point_at(1.), Point2::new(3., 0.));
    /// ```
    pub fn histogram(top: Point2<T>) -> Self {
        Self::new(top, Point2::new(top.x, T::zero()))
    }

    pub fn start(&self) -> &Point2<T> {
        &self.start
    }

    pub fn end(&self) -> &Point2<T> {
        &self.end
    }

    pub fn tangent(&self) -> Vector2<T> {
        self.end - self.start
    }

    /// Evaluate the line at a given parameter.
    /// Both ends are reproduced exactly at t = 0 and t = 1.
    pub fn point_at(&self, t: T) -> Point2<T> {
        Point2::new(
            lerp(self.start.x, self.end.x, t),
            lerp(self.start.y, self.end.y, t),
        )
    }

    /// Check if a point lies on the segment within `epsilon`.
    /// # Example
    /// ```
    /// use nalgebra::Point2;
    /// use parasolv::prelude::*;
    ///
    /// let ab = Line::new(Point2::new(1., 1.), Point2::new(4., 1.));
    /// assert!(ab.has_point(&Point2::new(2., 1.), 1e-4));
    /// assert!(ab.has_point(&Point2::new(2., 1.02), 0.1));
    /// assert!(!ab.has_point(&Point2::new(2., 1.02), 0.01));
    /// ```
    pub fn has_point(&self, point: &Point2<T>, epsilon: T) -> bool {
        let d = self.tangent();
        let len2 = d.norm_squared();
        let closest = if len2 > T::zero() {
            let u = ((point - self.start).dot(&d) / len2).clamp(T::zero(), T::one());
            self.start + d * u
        } else {
            self.start
        };
        distance_squared(&closest, point) <= epsilon * epsilon
    }

    /// Returns the bounding box of the line.
    pub fn bounding_rect(&self) -> Rectangle<T> {
        Rectangle::new(self.start, self.end)
    }
}

/// Interpolate between `a` and `b`, constant when both ends agree.
fn lerp<T: FloatingPoint>(a: T, b: T, t: T) -> T {
    if a == b {
        a
    } else {
        a * (T::one() - t) + b * t
    }
}

impl<T: FloatingPoint> ParametricCurve<T> for Line<T> {
    fn try_point_at(&self, t: T) -> anyhow::Result<Point2<T>> {
        Ok(self.point_at(t))
    }
}

impl<T: FloatingPoint> fmt::Display for Line<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line from ({}, {}) to ({}, {})",
            self.start.x, self.start.y, self.end.x, self.end.y
        )
    }
}
