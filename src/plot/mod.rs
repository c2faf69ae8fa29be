//! Console plotting of points and sampled curves on a character grid.

use log::trace;
use nalgebra::Point2;

use crate::{
    curve::{ParametricCurve, Sampler},
    error::Error,
    misc::FloatingPoint,
};

/// Tick labels placed along the axes: 0-9, d/c/m for 0.1/0.01/0.001 and roman numerals.
const REFERENCES: [(f64, char); 18] = [
    (0.001, 'm'),
    (0.01, 'c'),
    (0.1, 'd'),
    (0., '0'),
    (1., '1'),
    (2., '2'),
    (3., '3'),
    (4., '4'),
    (5., '5'),
    (6., '6'),
    (7., '7'),
    (8., '8'),
    (9., '9'),
    (10., 'X'),
    (50., 'L'),
    (100., 'C'),
    (500., 'D'),
    (1000., 'M'),
];

/// A naive plotter drawing markers on a `cols` x `rows` character grid.
///
/// Markers are drawn in insertion order, later ones overwriting earlier ones.
/// Axes, reference ticks, the origin and the axis tips are drawn on top.
///
/// # Example
/// ```
/// use nalgebra::Point2;
/// use parasolv::prelude::*;
///
/// let mut plot = TextPlot::new()
///     .with_size(7, 7)
///     .with_background('.')
///     .with_references(false);
/// plot.zoom(Some(-700.), Some(700.), Some(-700.), Some(700.));
/// plot.add_point(Point2::new(-700., 700.), 'x');
/// let text = plot.try_render().unwrap();
/// assert_eq!(text.lines().nth(1), Some("x..^..."));
/// ```
#[derive(Clone, Debug)]
pub struct TextPlot<T: FloatingPoint> {
    cols: usize,
    rows: usize,
    xmin: T,
    xmax: T,
    ymin: T,
    ymax: T,
    background: char,
    references: bool,
    marks: Vec<(Point2<T>, char)>,
}

impl<T: FloatingPoint> Default for TextPlot<T> {
    fn default() -> Self {
        Self {
            cols: 79,
            rows: 23,
            xmin: T::constant(-1.1),
            xmax: T::constant(2.1),
            ymin: T::constant(-1.1),
            ymax: T::constant(1.1),
            background: ' ',
            references: true,
            marks: vec![],
        }
    }
}

impl<T: FloatingPoint> TextPlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, cols: usize, rows: usize) -> Self {
        self.set_size(cols, rows);
        self
    }

    pub fn with_viewport(mut self, xmin: T, xmax: T, ymin: T, ymax: T) -> Self {
        self.zoom(Some(xmin), Some(xmax), Some(ymin), Some(ymax));
        self
    }

    pub fn with_background(mut self, background: char) -> Self {
        self.background = background;
        self
    }

    /// Toggle the tick labels along the axes.
    pub fn with_references(mut self, references: bool) -> Self {
        self.references = references;
        self
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Viewport as (xmin, xmax, ymin, ymax).
    pub fn viewport(&self) -> (T, T, T, T) {
        (self.xmin, self.xmax, self.ymin, self.ymax)
    }

    pub fn set_size(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Override any of the viewport bounds.
    pub fn zoom(&mut self, xmin: Option<T>, xmax: Option<T>, ymin: Option<T>, ymax: Option<T>) {
        self.xmin = xmin.unwrap_or(self.xmin);
        self.xmax = xmax.unwrap_or(self.xmax);
        self.ymin = ymin.unwrap_or(self.ymin);
        self.ymax = ymax.unwrap_or(self.ymax);
    }

    /// Grow the viewport until it contains every point.
    pub fn fit<'a, I: IntoIterator<Item = &'a Point2<T>>>(&mut self, points: I) {
        for p in points {
            self.xmin = self.xmin.min(p.x);
            self.xmax = self.xmax.max(p.x);
            self.ymin = self.ymin.min(p.y);
            self.ymax = self.ymax.max(p.y);
        }
    }

    /// Grow the viewport until it contains every marker added so far.
    pub fn fit_all(&mut self) {
        let marks = std::mem::take(&mut self.marks);
        self.fit(marks.iter().map(|(p, _)| p));
        self.marks = marks;
    }

    pub fn add_point(&mut self, point: Point2<T>, marker: char) {
        self.marks.push((point, marker));
    }

    pub fn add_points<I: IntoIterator<Item = Point2<T>>>(&mut self, points: I, marker: char) {
        self.marks.extend(points.into_iter().map(|p| (p, marker)));
    }

    /// Add every point of a sampler
    /// # Failures
    /// - if the curve can not be evaluated at one of the sampled parameters
    pub fn try_add_sampler<C: ParametricCurve<T>>(
        &mut self,
        sampler: &Sampler<T, C>,
        marker: char,
    ) -> anyhow::Result<()> {
        let points = sampler.try_points()?;
        self.add_points(points, marker);
        Ok(())
    }

    /// Sample a curve from `tmin` to `tmax` with a fixed `step` and add its points
    /// # Failures
    /// - if the range or the step is invalid
    /// - if the curve can not be evaluated at one of the sampled parameters
    pub fn try_add_curve<C: ParametricCurve<T>>(
        &mut self,
        curve: C,
        tmin: T,
        tmax: T,
        step: T,
        marker: char,
    ) -> anyhow::Result<()> {
        let sampler = Sampler::try_new(curve, tmin, tmax, step)?;
        self.try_add_sampler(&sampler, marker)
    }

    /// Render the plot with a title line followed by the grid rows, top row first
    /// # Failures
    /// - if the grid has no cells or the viewport is empty
    pub fn try_render(&self) -> anyhow::Result<String> {
        anyhow::ensure!(
            self.cols > 0 && self.rows > 0,
            Error::invalid_range(format!("empty grid {}x{}", self.cols, self.rows))
        );
        anyhow::ensure!(
            self.xmin < self.xmax && self.ymin < self.ymax,
            Error::invalid_range(format!(
                "empty viewport [{}, {}] x [{}, {}]",
                self.xmin, self.xmax, self.ymin, self.ymax
            ))
        );

        let mut grid = vec![vec![self.background; self.cols]; self.rows];
        for (point, marker) in self.marks.iter() {
            self.draw(&mut grid, point, *marker);
        }

        let zero = T::zero();
        let zero_col = (self.xmin <= zero && zero <= self.xmax)
            .then(|| scale(zero, self.xmin, self.xmax, self.cols))
            .flatten();
        let zero_row = (self.ymin <= zero && zero <= self.ymax)
            .then(|| scale(zero, self.ymin, self.ymax, self.rows))
            .flatten();
        if let Some(col) = zero_col {
            grid.iter_mut().for_each(|row| row[col] = '|');
        }
        if let Some(row) = zero_row {
            grid[row].fill('-');
        }

        if self.references {
            let references = REFERENCES
                .iter()
                .flat_map(|&(v, c)| [(T::constant(v), c), (T::constant(-v), c)]);
            if zero_col.is_some() {
                for (v, c) in references.clone() {
                    self.draw(&mut grid, &Point2::new(zero, v), c);
                }
            }
            if zero_row.is_some() {
                for (v, c) in references {
                    self.draw(&mut grid, &Point2::new(v, zero), c);
                }
            }
        }

        self.draw(&mut grid, &Point2::origin(), '+');
        self.draw(&mut grid, &Point2::new(zero, self.ymax), '^');
        self.draw(&mut grid, &Point2::new(self.xmax, zero), '>');

        trace!(
            "rendered {} markers on a {}x{} grid",
            self.marks.len(),
            self.cols,
            self.rows
        );

        let mut output = format!("TextPlot, {}x{}", self.cols, self.rows);
        for line in grid.iter().rev() {
            output.push('\n');
            output.push_str(line.iter().collect::<String>().trim_end());
        }
        Ok(output.trim_end().to_string())
    }

    /// Grid cell (column, row from the bottom) of a point inside the viewport.
    fn cell(&self, point: &Point2<T>) -> Option<(usize, usize)> {
        let inside = self.xmin <= point.x
            && point.x <= self.xmax
            && self.ymin <= point.y
            && point.y <= self.ymax;
        if !inside {
            return None;
        }
        let col = scale(point.x, self.xmin, self.xmax, self.cols)?;
        let row = scale(point.y, self.ymin, self.ymax, self.rows)?;
        Some((col, row))
    }

    /// Write a marker in the cell of a point, ignoring points outside the viewport.
    fn draw(&self, grid: &mut [Vec<char>], point: &Point2<T>, marker: char) {
        if let Some((col, row)) = self.cell(point) {
            grid[row][col] = marker;
        }
    }
}

/// Map a value of [min, max] to one of `cells` indices, max landing on the last cell.
fn scale<T: FloatingPoint>(value: T, min: T, max: T, cells: usize) -> Option<usize> {
    let last = cells.checked_sub(1)?;
    let span = T::from_usize(last)?;
    let index = (span * (value - min) / (max - min)).floor().to_usize()?;
    Some(index.min(last))
}
