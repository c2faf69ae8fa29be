use std::{cmp::Ordering, collections::HashMap};

use itertools::Itertools;
use log::{debug, trace};
use nalgebra::Point2;

use crate::{
    curve::{ParametricCurve, Rectangle, Sampler},
    error::Error,
    intersects::CurveCurveIntersection,
    misc::FloatingPoint,
};

use super::{ParaSolverOptions, SampleLog};

/// Selects one of the two curves handled by a [`ParaSolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    F,
    G,
}

/// A box enclosing the segment between two consecutive samples of a curve.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBox<T: FloatingPoint> {
    start: Point2<T>,
    end: Point2<T>,
    rectangle: Rectangle<T>,
}

impl<T: FloatingPoint> SampleBox<T> {
    pub fn new(start: Point2<T>, end: Point2<T>) -> Self {
        Self {
            start,
            end,
            rectangle: Rectangle::new(start, end),
        }
    }

    /// Sample the segment starts at.
    pub fn start(&self) -> &Point2<T> {
        &self.start
    }

    /// Sample the segment ends at.
    pub fn end(&self) -> &Point2<T> {
        &self.end
    }

    pub fn rectangle(&self) -> &Rectangle<T> {
        &self.rectangle
    }

    pub fn diagonal(&self) -> T {
        self.rectangle.diagonal()
    }
}

/// A box split in two at the mid parameter of its segment.
struct Bisection<T: FloatingPoint> {
    parameter: T,
    point: Point2<T>,
    head: SampleBox<T>,
    tail: SampleBox<T>,
}

/// Branch and bound search for the intersections of two parametric curves.
///
/// Both curves are seeded with parameter values, every pair of consecutive samples is enclosed in a box,
/// and pairs of overlapping boxes (the frontier) are bisected round after round until they are small enough.
/// Samples and boxes are never removed, the frontier holds indices into the box lists.
///
/// # Example
/// ```
/// use nalgebra::Point2;
/// use parasolv::prelude::*;
///
/// let f = Line::new(Point2::new(0., 0.), Point2::new(6., 10.));
/// let g = Line::new(Point2::new(1., 6.), Point2::new(3., 2.));
/// let mut solver = ParaSolver::new(f, g);
/// solver.try_seed_regular(Side::F, 0., 1., 5).unwrap();
/// solver.try_seed_regular(Side::G, 0., 1., 5).unwrap();
/// assert!(solver.find_overlaps());
///
/// for _ in 0..10 {
///     solver.try_refine().unwrap();
/// }
/// assert!(solver.is_resolved(0.01));
/// ```
pub struct ParaSolver<T: FloatingPoint, F, G> {
    f: F,
    g: G,
    f_samples: SampleLog<T>,
    g_samples: SampleLog<T>,
    f_boxes: Vec<SampleBox<T>>,
    g_boxes: Vec<SampleBox<T>>,
    frontier: Vec<(usize, usize)>,
    lookup_tolerance: T,
}

impl<T, F, G> ParaSolver<T, F, G>
where
    T: FloatingPoint,
    F: ParametricCurve<T>,
    G: ParametricCurve<T>,
{
    pub fn new(f: F, g: G) -> Self {
        Self {
            f,
            g,
            f_samples: SampleLog::new(),
            g_samples: SampleLog::new(),
            f_boxes: vec![],
            g_boxes: vec![],
            frontier: vec![],
            lookup_tolerance: T::default_epsilon(),
        }
    }

    /// Set the distance within which a box endpoint matches a logged sample.
    pub fn with_lookup_tolerance(mut self, tolerance: T) -> Self {
        self.lookup_tolerance = tolerance;
        self
    }

    pub fn f(&self) -> &F {
        &self.f
    }

    pub fn g(&self) -> &G {
        &self.g
    }

    pub fn lookup_tolerance(&self) -> T {
        self.lookup_tolerance
    }

    pub fn samples(&self, side: Side) -> &SampleLog<T> {
        match side {
            Side::F => &self.f_samples,
            Side::G => &self.g_samples,
        }
    }

    pub fn boxes(&self, side: Side) -> &[SampleBox<T>] {
        match side {
            Side::F => &self.f_boxes,
            Side::G => &self.g_boxes,
        }
    }

    /// Pairs of (f box, g box) indices currently believed to enclose an intersection.
    pub fn frontier(&self) -> &[(usize, usize)] {
        &self.frontier
    }

    pub fn frontier_boxes(&self) -> impl Iterator<Item = (&SampleBox<T>, &SampleBox<T>)> {
        self.frontier
            .iter()
            .map(|&(i, j)| (&self.f_boxes[i], &self.g_boxes[j]))
    }

    /// Check if both boxes of every frontier pair have a diagonal smaller than `tolerance`.
    /// An empty frontier is trivially resolved.
    pub fn is_resolved(&self, tolerance: T) -> bool {
        self.frontier_boxes()
            .all(|(a, b)| a.diagonal() < tolerance && b.diagonal() < tolerance)
    }

    /// Evaluate one of the curves without logging the sample.
    pub fn try_point_at(&self, side: Side, t: T) -> anyhow::Result<Point2<T>> {
        match side {
            Side::F => self.f.try_point_at(t),
            Side::G => self.g.try_point_at(t),
        }
    }

    /// Seed a curve with strictly increasing parameter values
    /// and return the number of boxes created (one less than the number of values).
    /// # Failures
    /// - if the values are empty or not strictly increasing
    /// - if the curve can not be evaluated at one of the values
    pub fn try_seed<I: IntoIterator<Item = T>>(
        &mut self,
        side: Side,
        values: I,
    ) -> anyhow::Result<usize> {
        let values = values.into_iter().collect_vec();
        anyhow::ensure!(!values.is_empty(), Error::invalid_range("no seed values"));
        anyhow::ensure!(
            values.iter().all(|t| t.is_finite())
                && values.iter().tuple_windows().all(|(a, b)| a < b),
            Error::invalid_range("seed values must be finite and strictly increasing")
        );

        let evaluated = values
            .into_iter()
            .map(|t| self.try_point_at(side, t).map(|p| (t, p)))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let boxes = evaluated
            .iter()
            .tuple_windows()
            .map(|((_, a), (_, b))| SampleBox::new(*a, *b))
            .collect_vec();
        let created = boxes.len();

        let (log, arena) = self.side_mut(side);
        evaluated.into_iter().for_each(|(t, p)| log.push(t, p));
        arena.extend(boxes);

        debug!("seeded {:?} with {} boxes", side, created);
        Ok(created)
    }

    /// Seed a curve with `samples` evenly spaced parameters from `tmin` to `tmax`.
    /// # Failures
    /// - if `samples` is less than 2 or `tmax` is not greater than `tmin`
    pub fn try_seed_regular(
        &mut self,
        side: Side,
        tmin: T,
        tmax: T,
        samples: usize,
    ) -> anyhow::Result<usize> {
        anyhow::ensure!(
            samples >= 2,
            Error::invalid_range(format!("at least 2 samples are required, got {}", samples))
        );
        anyhow::ensure!(
            tmax > tmin,
            Error::invalid_range(format!("tmax {} is not greater than tmin {}", tmax, tmin))
        );

        let n = T::from_usize(samples - 1).unwrap_or(T::one());
        let values = (0..samples).map(|i| {
            if i == samples - 1 {
                tmax
            } else {
                tmin + (tmax - tmin) * T::from_usize(i).unwrap_or(T::zero()) / n
            }
        });
        self.try_seed(side, values)
    }

    /// Seed a curve with the parameters of a sampler, which may sample any curve.
    /// # Failures
    /// - if the sampler yields a single parameter
    pub fn try_seed_sampler<C: ParametricCurve<T>>(
        &mut self,
        side: Side,
        sampler: &Sampler<T, C>,
    ) -> anyhow::Result<usize> {
        anyhow::ensure!(
            sampler.len() >= 2,
            Error::invalid_range(format!("at least 2 samples are required, got {}", sampler.len()))
        );
        self.try_seed(side, sampler.parameters())
    }

    /// Replace the frontier with every pair of overlapping boxes.
    /// Returns true if at least one pair overlaps.
    pub fn find_overlaps(&mut self) -> bool {
        let frontier = (0..self.f_boxes.len())
            .cartesian_product(0..self.g_boxes.len())
            .filter(|&(i, j)| {
                self.f_boxes[i]
                    .rectangle()
                    .overlaps(self.g_boxes[j].rectangle())
            })
            .collect_vec();

        debug!(
            "{} overlapping pairs among {}x{} boxes",
            frontier.len(),
            self.f_boxes.len(),
            self.g_boxes.len()
        );
        self.frontier = frontier;
        !self.frontier.is_empty()
    }

    /// Bisect both boxes of every frontier pair and keep the overlapping children as the next frontier.
    /// A box shared by several pairs is bisected once. Refining an empty frontier does nothing.
    /// # Failures
    /// - if a box endpoint can not be found in the sample log
    /// - if a curve can not be evaluated at a mid parameter
    ///
    /// Nothing is modified when an error is returned.
    pub fn try_refine(&mut self) -> anyhow::Result<&[(usize, usize)]> {
        if self.frontier.is_empty() {
            return Ok(&self.frontier);
        }

        let f_plan = self.try_plan(Side::F)?;
        let g_plan = self.try_plan(Side::G)?;

        let f_children = self.commit(Side::F, f_plan);
        let g_children = self.commit(Side::G, g_plan);

        let frontier = self
            .frontier
            .iter()
            .flat_map(|(i, j)| {
                f_children[i]
                    .into_iter()
                    .cartesian_product(g_children[j])
            })
            .filter(|&(i, j)| {
                self.f_boxes[i]
                    .rectangle()
                    .overlaps(self.g_boxes[j].rectangle())
            })
            .collect_vec();

        debug!(
            "refined {} pairs into {}",
            self.frontier.len(),
            frontier.len()
        );
        self.frontier = frontier;
        Ok(&self.frontier)
    }

    /// Find the parameters of the two samples a box was built from, in increasing order
    /// # Failures
    /// - if the index is out of bounds
    /// - if an endpoint can not be found in the sample log
    pub fn try_box_parameters(&self, side: Side, index: usize) -> anyhow::Result<(T, T)> {
        let sbox = self.boxes(side).get(index).ok_or_else(|| {
            Error::invalid_range(format!("no box {} on {:?}", index, side))
        })?;
        let log = self.samples(side);
        let t0 = log.try_find_parameter(sbox.start(), self.lookup_tolerance)?;
        let t1 = log.try_find_parameter(sbox.end(), self.lookup_tolerance)?;
        Ok(if t0 <= t1 { (t0, t1) } else { (t1, t0) })
    }

    /// Seed both curves, then refine until every frontier pair is resolved
    /// # Failures
    /// - if seeding or refinement fails
    /// - if the frontier is not resolved within `max_rounds` rounds
    ///
    /// # Example
    /// ```
    /// use approx::assert_relative_eq;
    /// use nalgebra::Point2;
    /// use parasolv::prelude::*;
    ///
    /// let f = Line::new(Point2::new(0., 0.), Point2::new(6., 10.));
    /// let g = Line::new(Point2::new(1., 6.), Point2::new(3., 2.));
    /// let mut solver = ParaSolver::new(f, g);
    /// let intersections = solver
    ///     .try_find_intersections((0., 1.), (0., 1.), None)
    ///     .unwrap();
    /// assert_eq!(intersections.len(), 1);
    /// assert_relative_eq!(intersections[0].a().0, Point2::new(24. / 11., 40. / 11.), epsilon = 1e-5);
    /// ```
    pub fn try_find_intersections(
        &mut self,
        f_range: (T, T),
        g_range: (T, T),
        options: Option<ParaSolverOptions<T>>,
    ) -> anyhow::Result<Vec<CurveCurveIntersection<T>>> {
        let options = options.unwrap_or_default();

        self.try_seed_regular(Side::F, f_range.0, f_range.1, options.seed_samples)?;
        self.try_seed_regular(Side::G, g_range.0, g_range.1, options.seed_samples)?;
        self.find_overlaps();

        let mut rounds = 0;
        loop {
            if self.frontier.is_empty() {
                debug!("frontier emptied after {} rounds", rounds);
                return Ok(vec![]);
            }
            if self.is_resolved(options.tolerance) {
                break;
            }
            anyhow::ensure!(
                rounds < options.max_rounds,
                Error::NonConvergence {
                    rounds,
                    remaining: self.frontier.len(),
                }
            );
            self.try_refine()?;
            rounds += 1;
        }
        debug!(
            "resolved {} pairs after {} rounds",
            self.frontier.len(),
            rounds
        );

        let candidates = self
            .frontier
            .iter()
            .map(|&(i, j)| {
                let (t0, t1) = self.try_box_parameters(Side::F, i)?;
                let (s0, s1) = self.try_box_parameters(Side::G, j)?;
                let t = T::mean(t0, t1);
                let s = T::mean(s0, s1);
                Ok(CurveCurveIntersection::new(
                    (self.f.try_point_at(t)?, t),
                    (self.g.try_point_at(s)?, s),
                ))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        // group near parameter results & extract the closest one in each group
        let minimum_distance = options.minimum_distance;
        let intersections = candidates
            .into_iter()
            .sorted_by(|x, y| {
                x.a_parameter()
                    .partial_cmp(&y.a_parameter())
                    .unwrap_or(Ordering::Equal)
            })
            .map(|it| vec![it])
            .coalesce(|x, y| {
                let x0 = &x[x.len() - 1];
                let y0 = &y[0];
                let da = (x0.a_parameter() - y0.a_parameter()).abs();
                let db = (x0.b_parameter() - y0.b_parameter()).abs();
                if da < minimum_distance && db < minimum_distance {
                    Ok([x, y].concat())
                } else {
                    Err((x, y))
                }
            })
            .filter_map(|group| {
                group.into_iter().min_by(|x, y| {
                    x.gap_squared()
                        .partial_cmp(&y.gap_squared())
                        .unwrap_or(Ordering::Equal)
                })
            })
            .collect_vec();

        Ok(intersections)
    }

    fn side_mut(&mut self, side: Side) -> (&mut SampleLog<T>, &mut Vec<SampleBox<T>>) {
        match side {
            Side::F => (&mut self.f_samples, &mut self.f_boxes),
            Side::G => (&mut self.g_samples, &mut self.g_boxes),
        }
    }

    /// Compute the bisection of every distinct frontier box on one side without touching the state.
    fn try_plan(&self, side: Side) -> anyhow::Result<Vec<(usize, Bisection<T>)>> {
        self.frontier
            .iter()
            .map(|&(i, j)| match side {
                Side::F => i,
                Side::G => j,
            })
            .unique()
            .map(|index| self.try_bisect(side, index).map(|b| (index, b)))
            .collect()
    }

    fn try_bisect(&self, side: Side, index: usize) -> anyhow::Result<Bisection<T>> {
        let sbox = &self.boxes(side)[index];
        let log = self.samples(side);
        let t0 = log.try_find_parameter(sbox.start(), self.lookup_tolerance)?;
        let t1 = log.try_find_parameter(sbox.end(), self.lookup_tolerance)?;
        let (low, high) = if t0 <= t1 {
            (*sbox.start(), *sbox.end())
        } else {
            (*sbox.end(), *sbox.start())
        };

        let parameter = T::mean(t0, t1);
        let point = self.try_point_at(side, parameter)?;
        trace!(
            "bisect {:?} box {} at {} -> ({}, {})",
            side,
            index,
            parameter,
            point.x,
            point.y
        );

        Ok(Bisection {
            parameter,
            point,
            head: SampleBox::new(low, point),
            tail: SampleBox::new(point, high),
        })
    }

    /// Append the planned samples & child boxes, returning the child indices of each parent box.
    fn commit(
        &mut self,
        side: Side,
        plan: Vec<(usize, Bisection<T>)>,
    ) -> HashMap<usize, [usize; 2]> {
        let (log, arena) = self.side_mut(side);
        plan.into_iter()
            .map(|(parent, bisection)| {
                log.push(bisection.parameter, bisection.point);
                let head = arena.len();
                arena.push(bisection.head);
                arena.push(bisection.tail);
                (parent, [head, head + 1])
            })
            .collect()
    }
}
