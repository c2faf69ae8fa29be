use crate::misc::FloatingPoint;

/// Hyperparameters for driving the box bisection solver to convergence.
#[derive(Clone, Debug)]
pub struct ParaSolverOptions<T: FloatingPoint> {
    /// Number of evenly spaced parameters used to seed each curve.
    /// The first boxes must be fine enough to separate distinct crossings.
    pub seed_samples: usize,
    /// A box pair is resolved once both box diagonals are smaller than this value.
    pub tolerance: T,
    /// Maximum number of refinement rounds before giving up.
    pub max_rounds: usize,
    /// Intersections closer than this in both parameters are merged into one.
    pub minimum_distance: T,
}

impl<T: FloatingPoint> Default for ParaSolverOptions<T> {
    fn default() -> Self {
        Self {
            seed_samples: 16,
            tolerance: T::constant(1e-6),
            max_rounds: 64,
            minimum_distance: T::constant(1e-3),
        }
    }
}

impl<T: FloatingPoint> ParaSolverOptions<T> {
    pub fn with_seed_samples(mut self, seed_samples: usize) -> Self {
        self.seed_samples = seed_samples;
        self
    }

    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_minimum_distance(mut self, minimum_distance: T) -> Self {
        self.minimum_distance = minimum_distance;
        self
    }
}
