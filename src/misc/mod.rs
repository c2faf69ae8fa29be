pub mod floating_point;
pub mod point;

pub use floating_point::*;
pub use point::*;
