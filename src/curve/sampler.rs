use nalgebra::Point2;

use crate::{error::Error, misc::FloatingPoint};

use super::ParametricCurve;

/// A curve evaluated at a fixed step from `tmin` to `tmax`, both ends inclusive.
///
/// The sampler is lazy and restartable: every call to [`Sampler::iter`] replays the
/// sequence from `tmin` without mutating the curve.
#[derive(Clone, Debug)]
pub struct Sampler<T: FloatingPoint, C> {
    curve: C,
    tmin: T,
    tmax: T,
    step: T,
    count: usize,
}

impl<T: FloatingPoint, C: ParametricCurve<T>> Sampler<T, C> {
    /// Create a new sampler
    /// # Failures
    /// - if the step is not a positive finite number
    /// - if `tmax` is smaller than `tmin`
    ///
    /// # Example
    /// ```
    /// use nalgebra::Point2;
    /// use parasolv::prelude::*;
    ///
    /// let f = Function::new(|x: f64| x + 2.);
    /// let sampler = Sampler::try_new(f, 0., 9., 1.).unwrap();
    /// let points = sampler.try_points().unwrap();
    /// assert_eq!(points.len(), 10);
    /// assert_eq!(points[0], Point2::new(0., 2.));
    /// assert_eq!(points[9], Point2::new(9., 11.));
    /// ```
    pub fn try_new(curve: C, tmin: T, tmax: T, step: T) -> anyhow::Result<Self> {
        anyhow::ensure!(
            step > T::zero() && step.is_finite(),
            Error::invalid_range(format!("step must be positive, got {}", step))
        );
        anyhow::ensure!(
            tmin.is_finite() && tmax.is_finite(),
            Error::invalid_range(format!("range [{}, {}] is not finite", tmin, tmax))
        );
        anyhow::ensure!(
            tmax >= tmin,
            Error::invalid_range(format!("tmax {} is smaller than tmin {}", tmax, tmin))
        );

        let estimate = ((tmax - tmin) / step)
            .floor()
            .to_usize()
            .ok_or_else(|| Error::invalid_range("too many samples"))?;

        // settle rounding of the estimate by at most one step either way,
        // never counting a step that does not move the parameter
        let at = |k: usize| tmin + T::from_usize(k).unwrap_or(T::zero()) * step;
        let mut count = estimate + 1;
        if at(count) <= tmax && at(count) > at(count - 1) {
            count += 1;
        } else if count > 1 && at(count - 1) > tmax {
            count -= 1;
        }

        Ok(Self {
            curve,
            tmin,
            tmax,
            step,
            count,
        })
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn tmin(&self) -> T {
        self.tmin
    }

    pub fn tmax(&self) -> T {
        self.tmax
    }

    pub fn step(&self) -> T {
        self.step
    }

    /// Number of points the sampler yields.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate over the sampled parameters.
    pub fn parameters(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.count).map(move |k| self.parameter(k))
    }

    /// Iterate over the sampled points, starting again from `tmin`.
    pub fn iter(&self) -> SamplerIter<'_, T, C> {
        SamplerIter {
            sampler: self,
            index: 0,
        }
    }

    /// Evaluate every sample
    /// # Failures
    /// - if the curve can not be evaluated at one of the parameters
    pub fn try_points(&self) -> anyhow::Result<Vec<Point2<T>>> {
        self.iter().collect()
    }

    fn parameter(&self, k: usize) -> T {
        self.tmin + T::from_usize(k).unwrap_or(T::zero()) * self.step
    }
}

impl<'a, T: FloatingPoint, C: ParametricCurve<T>> IntoIterator for &'a Sampler<T, C> {
    type Item = anyhow::Result<Point2<T>>;
    type IntoIter = SamplerIter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the points of a [`Sampler`].
pub struct SamplerIter<'a, T: FloatingPoint, C> {
    sampler: &'a Sampler<T, C>,
    index: usize,
}

impl<T: FloatingPoint, C: ParametricCurve<T>> Iterator for SamplerIter<'_, T, C> {
    type Item = anyhow::Result<Point2<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.sampler.count {
            return None;
        }
        let t = self.sampler.parameter(self.index);
        self.index += 1;
        Some(self.sampler.curve.try_point_at(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.sampler.count - self.index;
        (rest, Some(rest))
    }
}

impl<T: FloatingPoint, C: ParametricCurve<T>> ExactSizeIterator for SamplerIter<'_, T, C> {}
