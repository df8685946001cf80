//! One single-objective HiGHS problem, as solved for a single objective tier.
//!
//! Columns are addressed by the position they were added at, which the
//! backend keeps equal to `VariableId::index`.

use highs::{Col, HighsModelStatus, RowProblem, Sense, SolvedModel};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

impl From<ObjectiveSense> for Sense {
    fn from(sense: ObjectiveSense) -> Self {
        match sense {
            ObjectiveSense::Minimize => Sense::Minimise,
            ObjectiveSense::Maximize => Sense::Maximise,
        }
    }
}

/// Outcome of a HiGHS run, before it is folded into `SolverStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighsStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// Presolve proved one of the two without telling which.
    UnboundedOrInfeasible,
    ReachedTimeLimit,
    ReachedIterationLimit,
    /// Any other model status, or a run that HiGHS itself rejected.
    Unknown,
}

impl From<HighsModelStatus> for HighsStatus {
    fn from(status: HighsModelStatus) -> Self {
        match status {
            HighsModelStatus::Optimal => HighsStatus::Optimal,
            HighsModelStatus::Infeasible => HighsStatus::Infeasible,
            HighsModelStatus::Unbounded => HighsStatus::Unbounded,
            HighsModelStatus::UnboundedOrInfeasible => HighsStatus::UnboundedOrInfeasible,
            HighsModelStatus::ReachedTimeLimit => HighsStatus::ReachedTimeLimit,
            HighsModelStatus::ReachedIterationLimit => HighsStatus::ReachedIterationLimit,
            _ => HighsStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TierProblemError {
    /// A row referenced a column that was never added.
    #[error("[HIGHS_UNKNOWN_COLUMN] Row references column {column}, only {available} added")]
    UnknownColumn { column: usize, available: usize },
    /// Primal values were requested before an optimal solve.
    #[error("[HIGHS_NOT_SOLVED] No solved problem to read values from")]
    NotSolved,
}

impl TierProblemError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            TierProblemError::UnknownColumn { .. } => "HIGHS_UNKNOWN_COLUMN",
            TierProblemError::NotSolved => "HIGHS_NOT_SOLVED",
        }
    }
}

/// Typed value for a HiGHS option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    Text(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

/// Columns, rows and options for one HiGHS run.
///
/// [`TierProblem::solve`] hands the built problem to HiGHS; a new
/// `TierProblem` is built for every tier.
pub struct TierProblem {
    problem: RowProblem,
    columns: Vec<Col>,
    rows: usize,
    sense: ObjectiveSense,
    console_log: bool,
    options: Vec<(String, OptionValue)>,
    solved: Option<SolvedModel>,
}

impl TierProblem {
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            problem: RowProblem::default(),
            columns: Vec::new(),
            rows: 0,
            sense,
            console_log: false,
            options: Vec::new(),
            solved: None,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Add a column with bounds `[lower, upper]` and objective coefficient
    /// `cost`, returning its position.
    pub fn add_column(&mut self, lower: f64, upper: f64, cost: f64, integer: bool) -> usize {
        let col = if integer {
            self.problem.add_integer_column(cost, lower..=upper)
        } else {
            self.problem.add_column(cost, lower..=upper)
        };
        self.columns.push(col);
        trace!(
            component = "highs",
            operation = "add_column",
            status = "success",
            column = self.columns.len() - 1,
            cost,
            integer,
            "Added column"
        );
        self.columns.len() - 1
    }

    /// Add `lower <= Σ coeff * column <= upper`, returning the row position.
    ///
    /// # Errors
    ///
    /// Fails without adding anything when a term names an unknown column.
    pub fn add_row(
        &mut self,
        lower: f64,
        upper: f64,
        terms: &[(usize, f64)],
    ) -> Result<usize, TierProblemError> {
        let factors = terms
            .iter()
            .map(|&(column, coeff)| {
                self.columns
                    .get(column)
                    .map(|col| (*col, coeff))
                    .ok_or(TierProblemError::UnknownColumn {
                        column,
                        available: self.columns.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.problem.add_row(lower..=upper, factors);
        self.rows += 1;
        Ok(self.rows - 1)
    }

    /// Route HiGHS's own log output to the console.
    pub fn set_console_log(&mut self, enabled: bool) {
        self.console_log = enabled;
    }

    /// Queue an option, applied in order when the problem is solved.
    pub fn set_option(&mut self, name: &str, value: impl Into<OptionValue>) {
        self.options.push((name.to_string(), value.into()));
    }

    /// Hand the problem to HiGHS and block until it returns.
    pub fn solve(&mut self) -> HighsStatus {
        debug!(
            component = "highs",
            operation = "solve",
            status = "start",
            columns = self.columns.len() as u64,
            rows = self.rows as u64,
            sense = ?self.sense,
            "Running HiGHS"
        );

        let mut model = std::mem::take(&mut self.problem).optimise(self.sense.into());
        if self.console_log {
            model.set_option("output_flag", true);
            model.set_option("log_to_console", true);
        } else {
            model.make_quiet();
        }
        for (name, value) in self.options.drain(..) {
            match value {
                OptionValue::Bool(v) => model.set_option(name.as_str(), v),
                OptionValue::Int(v) => model.set_option(name.as_str(), v),
                OptionValue::Float(v) => model.set_option(name.as_str(), v),
                OptionValue::Text(v) => model.set_option(name.as_str(), v.as_str()),
            }
        }

        match model.try_solve() {
            Ok(solved) => {
                let status = HighsStatus::from(solved.status());
                trace!(
                    component = "highs",
                    operation = "solve",
                    status = "success",
                    highs_status = status.as_str(),
                    "HiGHS returned"
                );
                self.solved = Some(solved);
                status
            }
            Err(err) => {
                warn!(
                    component = "highs",
                    operation = "solve",
                    status = "error",
                    run_status = ?err,
                    "HiGHS rejected the run"
                );
                self.solved = None;
                HighsStatus::Unknown
            }
        }
    }

    /// Column values of the last solve, in column order.
    ///
    /// # Errors
    ///
    /// [`TierProblemError::NotSolved`] before a solve, or after a run HiGHS
    /// rejected.
    pub fn column_values(&self) -> Result<Vec<f64>, TierProblemError> {
        let solved = self.solved.as_ref().ok_or(TierProblemError::NotSolved)?;
        Ok(solved.get_solution().columns().to_vec())
    }
}

impl fmt::Debug for TierProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TierProblem")
            .field("columns", &self.columns.len())
            .field("rows", &self.rows)
            .field("sense", &self.sense)
            .field("solved", &self.solved.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_numbered_in_order() {
        let mut problem = TierProblem::new(ObjectiveSense::Maximize);
        let a = problem.add_column(0.0, 1.0, 1.0, true);
        let b = problem.add_column(0.0, 1.0, 0.0, true);
        assert_eq!((a, b), (0, 1));
        assert_eq!(problem.add_row(f64::NEG_INFINITY, 0.0, &[(b, 1.0), (a, -1.0)]), Ok(0));
        assert_eq!(problem.add_row(1.0, f64::INFINITY, &[(a, 1.0)]), Ok(1));
        assert_eq!(problem.num_rows(), 2);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let mut problem = TierProblem::new(ObjectiveSense::Minimize);
        problem.add_column(0.0, 1.0, 0.0, false);
        let err = problem.add_row(0.0, 1.0, &[(0, 1.0), (3, 1.0)]).unwrap_err();
        assert_eq!(
            err,
            TierProblemError::UnknownColumn {
                column: 3,
                available: 1
            }
        );
        assert_eq!(problem.num_rows(), 0);
        assert_eq!(err.code(), "HIGHS_UNKNOWN_COLUMN");
        assert_eq!(
            err.to_string(),
            "[HIGHS_UNKNOWN_COLUMN] Row references column 3, only 1 added"
        );
    }

    #[test]
    fn values_require_a_solve() {
        let problem = TierProblem::new(ObjectiveSense::Maximize);
        let err = problem.column_values().unwrap_err();
        assert_eq!(err, TierProblemError::NotSolved);
        assert_eq!(err.code(), "HIGHS_NOT_SOLVED");
        assert!(err.to_string().starts_with("[HIGHS_NOT_SOLVED]"));
    }

    #[test]
    fn option_values_convert() {
        assert_eq!(OptionValue::from("off"), OptionValue::Text("off".to_string()));
        assert_eq!(OptionValue::from(30.0), OptionValue::Float(30.0));
        assert_eq!(OptionValue::from(4), OptionValue::Int(4));
    }
}
