use nalgebra::Point2;

use crate::{
    error::Error,
    misc::{distance_squared, FloatingPoint},
};

/// Append-only record of every evaluation of a curve, in evaluation order.
///
/// The log maps a point back to the parameter that produced it.
#[derive(Clone, Debug)]
pub struct SampleLog<T: FloatingPoint> {
    samples: Vec<(T, Point2<T>)>,
}

impl<T: FloatingPoint> Default for SampleLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatingPoint> SampleLog<T> {
    pub fn new() -> Self {
        Self { samples: vec![] }
    }

    pub fn push(&mut self, parameter: T, point: Point2<T>) {
        self.samples.push((parameter, point));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[(T, Point2<T>)] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &(T, Point2<T>)> {
        self.samples.iter()
    }

    /// Find the parameter of the first logged sample lying within `tolerance` of `point`
    /// # Failures
    /// - if no sample is close enough
    ///
    /// # Example
    /// ```
    /// use nalgebra::Point2;
    /// use parasolv::prelude::*;
    ///
    /// let mut log = SampleLog::new();
    /// log.push(0.5, Point2::new(1., 2.));
    /// assert_eq!(log.try_find_parameter(&Point2::new(1., 2.), 1e-9).unwrap(), 0.5);
    /// assert!(log.try_find_parameter(&Point2::new(1., 3.), 1e-9).is_err());
    /// ```
    pub fn try_find_parameter(&self, point: &Point2<T>, tolerance: T) -> anyhow::Result<T> {
        let threshold = tolerance * tolerance;
        self.samples
            .iter()
            .find(|(_, p)| distance_squared(p, point) <= threshold)
            .map(|(t, _)| *t)
            .ok_or_else(|| {
                Error::StaleLookup {
                    x: point.x.to_f64().unwrap_or(f64::NAN),
                    y: point.y.to_f64().unwrap_or(f64::NAN),
                }
                .into()
            })
    }
}
