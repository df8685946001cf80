//! Backend-independent termination status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a solve ended.
///
/// Only [`SolverStatus::Optimal`] yields a usable row selection; limit
/// statuses are reported even when the backend holds an incumbent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    ReachedTimeLimit,
    ReachedIterationLimit,
    /// The backend stopped without a classified outcome.
    Unknown,
}

impl SolverStatus {
    pub fn is_optimal(self) -> bool {
        self == SolverStatus::Optimal
    }

    /// Stopped by a configured time or iteration budget.
    pub fn hit_limit(self) -> bool {
        matches!(
            self,
            SolverStatus::ReachedTimeLimit | SolverStatus::ReachedIterationLimit
        )
    }

    /// Stable snake_case label, matching the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::ReachedTimeLimit => "reached_time_limit",
            SolverStatus::ReachedIterationLimit => "reached_iteration_limit",
            SolverStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
