//! Folding HiGHS outcomes into backend-independent statuses.

use crate::ffi::HighsStatus;
use prefixsel_solver::SolverStatus;

impl HighsStatus {
    /// Label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            HighsStatus::Optimal => "optimal",
            HighsStatus::Infeasible => "infeasible",
            HighsStatus::Unbounded => "unbounded",
            HighsStatus::UnboundedOrInfeasible => "unbounded_or_infeasible",
            HighsStatus::ReachedTimeLimit => "reached_time_limit",
            HighsStatus::ReachedIterationLimit => "reached_iteration_limit",
            HighsStatus::Unknown => "unknown",
        }
    }
}

/// An undecided infeasible-or-unbounded answer is reported as `Unknown`.
impl From<HighsStatus> for SolverStatus {
    fn from(status: HighsStatus) -> Self {
        match status {
            HighsStatus::Optimal => SolverStatus::Optimal,
            HighsStatus::Infeasible => SolverStatus::Infeasible,
            HighsStatus::Unbounded => SolverStatus::Unbounded,
            HighsStatus::ReachedTimeLimit => SolverStatus::ReachedTimeLimit,
            HighsStatus::ReachedIterationLimit => SolverStatus::ReachedIterationLimit,
            HighsStatus::UnboundedOrInfeasible | HighsStatus::Unknown => SolverStatus::Unknown,
        }
    }
}
