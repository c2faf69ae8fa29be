use nalgebra::Point2;

use crate::misc::FloatingPoint;

use super::ParametricCurve;

/// Graph of a regular function y = f(x), traced with x = t.
///
/// # Example
/// ```
/// use nalgebra::Point2;
/// use parasolv::prelude::*;
///
/// let f = Function::new(|x: f64| (x + 2.) * (x - 1.) * (x - 2.));
/// assert_eq!(f.point_at(1.), Point2::new(1., 0.));
/// assert!(f.point_at(0.).y > 0.);
/// ```
#[derive(Clone, Copy)]
pub struct Function<F> {
    f: F,
}

impl<F> Function<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }

    pub fn point_at<T: FloatingPoint>(&self, t: T) -> Point2<T>
    where
        F: Fn(T) -> T,
    {
        Point2::new(t, (self.f)(t))
    }
}

impl<T: FloatingPoint, F: Fn(T) -> T> ParametricCurve<T> for Function<F> {
    fn try_point_at(&self, t: T) -> anyhow::Result<Point2<T>> {
        Ok(self.point_at(t))
    }
}

/// Parametric function with one closure per coordinate.
///
/// # Example
/// ```
/// use approx::assert_relative_eq;
/// use nalgebra::Point2;
/// use parasolv::prelude::*;
/// use std::f64::consts::PI;
///
/// let circle = ParaFunc::new(f64::cos, f64::sin);
/// assert_relative_eq!(circle.point_at(PI), Point2::new(-1., 0.), epsilon = 1e-6);
/// ```
#[derive(Clone, Copy)]
pub struct ParaFunc<FX, FY> {
    fx: FX,
    fy: FY,
}

impl<FX, FY> ParaFunc<FX, FY> {
    pub fn new(fx: FX, fy: FY) -> Self {
        Self { fx, fy }
    }

    pub fn point_at<T: FloatingPoint>(&self, t: T) -> Point2<T>
    where
        FX: Fn(T) -> T,
        FY: Fn(T) -> T,
    {
        Point2::new((self.fx)(t), (self.fy)(t))
    }
}

impl<T: FloatingPoint, FX: Fn(T) -> T, FY: Fn(T) -> T> ParametricCurve<T> for ParaFunc<FX, FY> {
    fn try_point_at(&self, t: T) -> anyhow::Result<Point2<T>> {
        Ok(self.point_at(t))
    }
}
