mod curve;
mod error;
mod intersects;
mod misc;
mod plot;

pub use error::Error;

pub mod prelude {
    pub use crate::curve::*;
    pub use crate::intersects::*;
    pub use crate::misc::*;
    pub use crate::plot::*;
}
