//! Backend-independent solver options and termination status.

mod config;
mod status;

pub use config::{DEFAULT_OBJECTIVE_TOLERANCE, SolverConfig};
pub use status::SolverStatus;
