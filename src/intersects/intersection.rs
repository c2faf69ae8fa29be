use nalgebra::Point2;

use crate::misc::{distance_squared, FloatingPoint};

/// A struct representing the intersection of two objects.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection<P, T0, T1> {
    /// The point & parameter of the first object at the intersection.
    a: (P, T0),
    /// The point & parameter of the second object at the intersection.
    b: (P, T1),
}

impl<P, T0, T1> Intersection<P, T0, T1> {
    pub fn new(a: (P, T0), b: (P, T1)) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> &(P, T0) {
        &self.a
    }

    pub fn b(&self) -> &(P, T1) {
        &self.b
    }

    pub fn as_tuple(self) -> ((P, T0), (P, T1)) {
        (self.a, self.b)
    }
}

impl<P, T0: Copy, T1: Copy> Intersection<P, T0, T1> {
    pub fn a_parameter(&self) -> T0 {
        self.a.1
    }

    pub fn b_parameter(&self) -> T1 {
        self.b.1
    }
}

/// A struct representing the intersection of two plane curves.
pub type CurveCurveIntersection<T> = Intersection<Point2<T>, T, T>;

impl<T: FloatingPoint> CurveCurveIntersection<T> {
    /// Squared distance between the points found on each curve.
    pub fn gap_squared(&self) -> T {
        distance_squared(&self.a.0, &self.b.0)
    }

    /// Point halfway between the points found on each curve.
    pub fn midpoint(&self) -> Point2<T> {
        nalgebra::center(&self.a.0, &self.b.0)
    }
}
