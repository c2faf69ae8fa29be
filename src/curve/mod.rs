pub mod function;
pub mod line;
pub mod rectangle;
pub mod sampler;
pub use function::*;
pub use line::*;
pub use rectangle::*;
pub use sampler::*;

use nalgebra::Point2;

use crate::misc::FloatingPoint;

/// A curve in the plane traced by a single real parameter.
///
/// Implementations must be pure: evaluating the same parameter twice yields the same point.
/// The intersection solver relies on this to map points back to the parameters that produced them.
pub trait ParametricCurve<T: FloatingPoint> {
    /// Evaluate the curve at a given parameter
    /// # Failures
    /// - if the parameter is outside of the domain of the curve
    fn try_point_at(&self, t: T) -> anyhow::Result<Point2<T>>;

    /// Create a sampler evaluating the curve from `tmin` to `tmax` with a fixed `step`.
    fn try_sampler(self, tmin: T, tmax: T, step: T) -> anyhow::Result<Sampler<T, Self>>
    where
        Self: Sized,
    {
        Sampler::try_new(self, tmin, tmax, step)
    }
}

impl<T: FloatingPoint, C: ParametricCurve<T> + ?Sized> ParametricCurve<T> for &C {
    fn try_point_at(&self, t: T) -> anyhow::Result<Point2<T>> {
        (**self).try_point_at(t)
    }
}

impl<T: FloatingPoint, C: ParametricCurve<T> + ?Sized> ParametricCurve<T> for Box<C> {
    fn try_point_at(&self, t: T) -> anyhow::Result<Point2<T>> {
        (**self).try_point_at(t)
    }
}
