use std::cmp::Ordering;

use nalgebra::Point2;

use super::FloatingPoint;

/// Squared euclidean distance between two points.
///
/// # Examples
/// ```
/// use nalgebra::Point2;
/// use parasolv::prelude::distance_squared;
///
/// let d = distance_squared(&Point2::new(1., 1.), &Point2::new(4., 5.));
/// assert_eq!(d, 25.);
/// ```
pub fn distance_squared<T: FloatingPoint>(a: &Point2<T>, b: &Point2<T>) -> T {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Lexicographic ordering of two points, x first.
/// NaN coordinates compare as equal.
pub fn compare_points<T: FloatingPoint>(a: &Point2<T>, b: &Point2<T>) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
}
