//! Model builder for linear and mixed-integer programs with prioritized objectives.

pub mod model;
pub mod solver;
pub mod types;

pub use model::{Model, ModelError, ObjectiveTier};
pub use solver::{Solution, Solver, SolverError};
pub use types::{Bounds, Constraint, ObjectiveSpec, Sense, Variable};

pub use prefixsel_solver::{SolverConfig, SolverStatus};
