pub mod para_solver;
pub mod para_solver_options;
pub mod sample_log;

pub use para_solver::*;
pub use para_solver_options::*;
pub use sample_log::*;

#[cfg(test)]
mod tests;
