use thiserror::Error;

/// Failures raised by curves, samplers and the intersection solver.
///
/// Fallible operations return `anyhow::Result`; the underlying value can be
/// recovered with `err.downcast_ref::<Error>()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A curve was evaluated outside of its parameter domain.
    #[error("parameter {parameter} is outside of the domain [{min}, {max}]")]
    Domain { parameter: f64, min: f64, max: f64 },
    /// A step size, parameter range or viewport is unusable.
    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },
    /// No logged sample lies within tolerance of a box endpoint.
    #[error("no sample found near ({x}, {y})")]
    StaleLookup { x: f64, y: f64 },
    /// The refinement budget ran out before every box pair was resolved.
    #[error("no convergence after {rounds} rounds, {remaining} box pairs left")]
    NonConvergence { rounds: usize, remaining: usize },
}

impl Error {
    pub(crate) fn invalid_range(reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            reason: reason.into(),
        }
    }
}
