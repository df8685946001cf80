//! HiGHS backend for prefix selection models.
//!
//! HiGHS optimizes a single objective, so the backend solves one HiGHS
//! problem per objective tier and holds each solved tier at its optimum
//! while the next tier is optimized.

pub mod ffi;
pub mod solver;
mod status;

pub use ffi::{HighsStatus, ObjectiveSense, OptionValue, TierProblem, TierProblemError};
pub use solver::HighsSolver;
