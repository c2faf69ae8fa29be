pub mod curve_curve;
pub mod intersection;

pub use curve_curve::*;
pub use intersection::*;
