//! Turns a solver result into a structured selection outcome.

use crate::builder::SelectionModel;
use crate::error::SelectionError;
use prefixsel_core::{Solution, SolverError};
use prefixsel_solver::SolverStatus;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Solver values at or above this cut are read as a selected row.
const SELECTION_CUT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Any other non-optimal end, including time and iteration limits.
    Unknown,
}

impl SelectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionStatus::Optimal => "optimal",
            SelectionStatus::Infeasible => "infeasible",
            SelectionStatus::Unbounded => "unbounded",
            SelectionStatus::Unknown => "unknown",
        }
    }

    pub fn is_optimal(self) -> bool {
        self == SelectionStatus::Optimal
    }
}

impl From<SolverStatus> for SelectionStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Optimal => SelectionStatus::Optimal,
            SolverStatus::Infeasible => SelectionStatus::Infeasible,
            SolverStatus::Unbounded => SelectionStatus::Unbounded,
            SolverStatus::ReachedTimeLimit
            | SolverStatus::ReachedIterationLimit
            | SolverStatus::Unknown => SelectionStatus::Unknown,
        }
    }
}

impl fmt::Display for SelectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unweighted objective values of the rounded selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectiveValues {
    /// Aggregate prefix risk.
    pub coverage: f64,
    /// Number of selected rows.
    pub parsimony: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintSlack {
    pub name: String,
    pub sense: &'static str,
    pub rhs: f64,
    pub activity: f64,
    /// Negative when violated.
    pub slack: f64,
}

/// Result of one selection run. Everything but `status` is present only
/// when the status is optimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOutcome {
    pub status: SelectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_values: Option<ObjectiveValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_slacks: Option<Vec<ConstraintSlack>>,
}

impl SelectionOutcome {
    pub fn not_optimal(status: SelectionStatus) -> Self {
        Self {
            status,
            selection: None,
            objective_values: None,
            selected_rows: None,
            coverage_target: None,
            constraint_slacks: None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionReporter;

impl SolutionReporter {
    pub fn new() -> Self {
        Self
    }

    /// Interpret a solve result.
    ///
    /// A non-optimal status, whether returned as
    /// [`SolverError::SolveFailure`] or carried by the solution, yields a
    /// status-only outcome.
    ///
    /// # Errors
    ///
    /// Other solver errors propagate, as does a solution missing a value
    /// for some selection variable.
    pub fn report(
        &self,
        built: &SelectionModel,
        result: Result<Solution, SolverError>,
    ) -> Result<SelectionOutcome, SelectionError> {
        let solution = match result {
            Ok(solution) => solution,
            Err(SolverError::SolveFailure { status }) => return Ok(self.non_optimal(status)),
            Err(err) => return Err(err.into()),
        };
        if !solution.is_optimal() {
            return Ok(self.non_optimal(solution.status));
        }

        let selection = built
            .selection()
            .iter()
            .map(|var| {
                solution
                    .get_primal(var.index())
                    .map(|value| u8::from(value >= SELECTION_CUT))
                    .ok_or(SolverError::InvalidVariableId(var.inner()))
            })
            .collect::<Result<Vec<u8>, SolverError>>()?;
        let values: Vec<f64> = selection.iter().map(|bit| f64::from(*bit)).collect();
        let selected_rows = selection.iter().filter(|bit| **bit == 1).count();

        let model = built.model();
        let constraint_slacks = built
            .constraints()
            .iter()
            .map(|constraint| {
                let activity = model.row_activity(constraint.id, &values);
                ConstraintSlack {
                    name: constraint.label.clone(),
                    sense: constraint.sense.as_str(),
                    rhs: constraint.rhs,
                    activity,
                    slack: constraint.sense.slack(activity, constraint.rhs),
                }
            })
            .collect();

        let objective_values = ObjectiveValues {
            coverage: built.target_risk().evaluate(&values),
            parsimony: selected_rows as f64,
        };

        debug!(
            component = "select",
            operation = "report",
            status = "success",
            selected_rows = selected_rows as u64,
            coverage = objective_values.coverage,
            coverage_target = built.coverage_target(),
            solve_time_seconds = solution.solve_time_seconds,
            "Optimal selection found"
        );

        Ok(SelectionOutcome {
            status: SelectionStatus::Optimal,
            selection: Some(selection),
            objective_values: Some(objective_values),
            selected_rows: Some(selected_rows),
            coverage_target: Some(built.coverage_target()),
            constraint_slacks: Some(constraint_slacks),
        })
    }

    fn non_optimal(&self, solver_status: SolverStatus) -> SelectionOutcome {
        let status = SelectionStatus::from(solver_status);
        warn!(
            component = "select",
            operation = "report",
            status = "warn",
            solver_status = solver_status.as_str(),
            hit_limit = solver_status.hit_limit(),
            "No optimal solution found"
        );
        SelectionOutcome::not_optimal(status)
    }
}
