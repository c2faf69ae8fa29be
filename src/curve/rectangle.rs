use std::fmt;

use nalgebra::{Point2, Vector2};

use crate::{error::Error, misc::FloatingPoint};

use super::{Line, ParametricCurve};

/// An axis-aligned rectangle in 2D space, defined by two diagonal corners.
///
/// A rectangle is also a closed parametric curve tracing its perimeter over t in [0, 1]:
/// bottom, right, top and left edges, a quarter of the domain each.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle<T: FloatingPoint> {
    min: Point2<T>,
    max: Point2<T>,
}

impl<T: FloatingPoint> Rectangle<T> {
    /// Create a new rectangle from any two diagonal corners.
    /// # Example
    /// ```
    /// use nalgebra::Point2;
    /// use parasolv::prelude::*;
    ///
    /// let r0 = Rectangle::new(Point2::new(2., 2.), Point2::new(3., 8.));
    /// let r1 = Rectangle::new(Point2::new(3., 8.), Point2::new(2., 2.));
    /// assert_eq!(r0, r1);
    /// assert_eq!(r1.min(), &Point2::new(2., 2.));
    /// ```
    pub fn new(a: Point2<T>, b: Point2<T>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Create the smallest rectangle enclosing every point of an iterator.
    /// An empty iterator yields an inverted rectangle that overlaps nothing.
    pub fn new_with_points<I: IntoIterator<Item = Point2<T>>>(iter: I) -> Self {
        let big = T::max_value().unwrap_or_else(|| T::constant(f64::MAX));
        let mut min = Point2::new(big, big);
        let mut max = Point2::new(-big, -big);

        for point in iter {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        Self { min, max }
    }

    /// Bottom-left corner.
    pub fn min(&self) -> &Point2<T> {
        &self.min
    }

    /// Top-right corner.
    pub fn max(&self) -> &Point2<T> {
        &self.max
    }

    pub fn center(&self) -> Point2<T> {
        Point2::new(
            T::mean(self.min.x, self.max.x),
            T::mean(self.min.y, self.max.y),
        )
    }

    pub fn size(&self) -> Vector2<T> {
        self.max - self.min
    }

    /// Length of the diagonal.
    pub fn diagonal(&self) -> T {
        self.size().norm()
    }

    /// Check if the rectangle overlaps another one.
    /// Touching edges count as an overlap.
    ///
    /// # Examples
    /// ```
    /// use nalgebra::Point2;
    /// use parasolv::prelude::*;
    ///
    /// let r11 = Rectangle::new(Point2::new(1., 1.), Point2::new(4., 5.));
    /// let r12 = Rectangle::new(Point2::new(1.5, 3.), Point2::new(3.5, 4.));
    /// let r31 = Rectangle::new(Point2::new(0.1, 0.3), Point2::new(0.7, 0.8));
    /// let r32 = Rectangle::new(Point2::new(2.1, 9.3), Point2::new(2.7, 9.8));
    /// assert!(r11.overlaps(&r12));
    /// assert!(!r11.overlaps(&r31));
    /// assert!(!r11.overlaps(&r32));
    /// ```
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.max.x < other.min.x || other.max.x < self.min.x {
            return false;
        }

        if self.max.y < other.min.y || other.max.y < self.min.y {
            return false;
        }

        true
    }

    /// Check if the rectangle contains a point, boundary included.
    pub fn contains(&self, point: &Point2<T>) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
    }

    /// Corners in perimeter order, starting at the bottom-left one.
    pub fn corners(&self) -> [Point2<T>; 4] {
        [
            self.min,
            Point2::new(self.max.x, self.min.y),
            self.max,
            Point2::new(self.min.x, self.max.y),
        ]
    }

    /// Bottom, right, top and left edges, each running in perimeter order.
    pub fn edges(&self) -> [Line<T>; 4] {
        let [a, b, c, d] = self.corners();
        [
            Line::new(a, b),
            Line::new(b, c),
            Line::new(c, d),
            Line::new(d, a),
        ]
    }

    /// Evaluate the perimeter at a given parameter
    /// # Failures
    /// - if the parameter is outside of [0, 1]
    ///
    /// # Example
    /// ```
    /// use nalgebra::Point2;
    /// use parasolv::prelude::*;
    ///
    /// let r = Rectangle::new(Point2::new(0., 0.), Point2::new(2., 1.));
    /// assert_eq!(r.try_point_at(0.25).unwrap(), Point2::new(2., 0.));
    /// assert_eq!(r.try_point_at(0.5).unwrap(), Point2::new(2., 1.));
    /// assert!(r.try_point_at(1.5).is_err());
    /// ```
    pub fn try_point_at(&self, t: T) -> anyhow::Result<Point2<T>> {
        anyhow::ensure!(
            t >= T::zero() && t <= T::one(),
            Error::Domain {
                parameter: t.to_f64().unwrap_or(f64::NAN),
                min: 0.,
                max: 1.,
            }
        );

        let [bottom, right, top, left] = self.edges();
        let four = T::constant(4.);
        let point = if t <= T::constant(0.25) {
            bottom.point_at(t * four)
        } else if t <= T::constant(0.5) {
            right.point_at(t * four - T::one())
        } else if t <= T::constant(0.75) {
            top.point_at(t * four - T::constant(2.))
        } else {
            left.point_at(t * four - T::constant(3.))
        };
        Ok(point)
    }
}

impl<T: FloatingPoint> FromIterator<Point2<T>> for Rectangle<T> {
    fn from_iter<I: IntoIterator<Item = Point2<T>>>(iter: I) -> Self {
        Self::new_with_points(iter)
    }
}

impl<T: FloatingPoint> ParametricCurve<T> for Rectangle<T> {
    fn try_point_at(&self, t: T) -> anyhow::Result<Point2<T>> {
        Rectangle::try_point_at(self, t)
    }
}

impl<T: FloatingPoint> fmt::Display for Rectangle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(({}, {}), ({}, {}))",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}
