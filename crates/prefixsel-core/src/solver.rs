//! The seam between a [`Model`] and whatever MILP backend solves it.

use crate::Model;
use prefixsel_solver::SolverStatus;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("[SOLVER_EMPTY_MODEL] Model has no variables")]
    EmptyModel,
    #[error("[SOLVER_NO_OBJECTIVE] Model has no objective")]
    NoObjective,
    #[error("[SOLVER_INVALID_VARIABLE_ID] Variable ID {0} does not exist")]
    InvalidVariableId(u32),
    /// Some objective tier ended without an optimum.
    #[error("[SOLVER_SOLVE_FAILURE] Solve failed with status: {status}")]
    SolveFailure {
        status: SolverStatus,
    },
    /// Backend failure with no portable meaning.
    #[error("[SOLVER_SPECIFIC] Solver error: {0}")]
    SolverSpecific(String),
}

impl SolverError {
    /// Stable code, also the bracketed prefix of the message.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyModel => "SOLVER_EMPTY_MODEL",
            SolverError::NoObjective => "SOLVER_NO_OBJECTIVE",
            SolverError::InvalidVariableId(_) => "SOLVER_INVALID_VARIABLE_ID",
            SolverError::SolveFailure { .. } => "SOLVER_SOLVE_FAILURE",
            SolverError::SolverSpecific(_) => "SOLVER_SPECIFIC",
        }
    }
}

/// Values of one finished solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Indexed by `VariableId::index`.
    pub primal_values: Vec<f64>,
    /// Constraint left-hand sides, indexed by `ConstraintId::index`.
    pub row_values: Vec<f64>,
    /// Value of each registered objective, in `Model::objectives()` order.
    pub objective_values: Vec<f64>,
    pub status: SolverStatus,
    /// Solve time in seconds, summed over all objective tiers.
    pub solve_time_seconds: f64,
    /// Backend extras such as per-tier objective values.
    pub metadata: BTreeMap<String, f64>,
}

impl Solution {
    /// Evaluate every row and objective of `model` at `primal_values`.
    pub fn from_primal(model: &Model, primal_values: Vec<f64>, status: SolverStatus) -> Self {
        let row_values = model
            .constraints()
            .map(|(id, _)| model.row_activity(id, &primal_values))
            .collect();
        let objective_values = model
            .objectives()
            .iter()
            .map(|objective| objective.expr.evaluate(&primal_values))
            .collect();
        Self {
            primal_values,
            row_values,
            objective_values,
            status,
            solve_time_seconds: 0.0,
            metadata: BTreeMap::new(),
        }
    }

    pub fn get_primal(&self, index: usize) -> Option<f64> {
        self.primal_values.get(index).copied()
    }

    /// Unweighted value of the `index`-th registered objective.
    pub fn get_objective_value(&self, index: usize) -> Option<f64> {
        self.objective_values.get(index).copied()
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }
}

/// A MILP backend.
///
/// Implementations solve the objective tiers of `model` in ascending
/// priority order, holding each solved tier for the next. A tier that ends
/// without an optimum ends the solve with [`SolverError::SolveFailure`].
pub trait Solver {
    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError>;
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::Variable;
    use prefixsel_expr::{Expr, sum_vars};

    #[test]
    fn errors_carry_codes() {
        assert_eq!(SolverError::EmptyModel.code(), "SOLVER_EMPTY_MODEL");
        assert!(SolverError::EmptyModel.to_string().contains("no variables"));
        assert!(SolverError::NoObjective.to_string().contains("no objective"));
        assert!(SolverError::InvalidVariableId(42).to_string().contains("42"));
        assert!(
            SolverError::SolverSpecific("oops".to_string())
                .to_string()
                .contains("oops")
        );

        let err = SolverError::SolveFailure {
            status: SolverStatus::Infeasible,
        };
        assert_eq!(err.code(), "SOLVER_SOLVE_FAILURE");
        assert!(err.to_string().contains("infeasible"));
    }

    #[test]
    fn solution_from_primal_evaluates_rows_and_objectives() {
        let mut model = Model::new();
        let vars = model.add_variables(2, Variable::binary()).unwrap();
        model
            .add_constraint_expr(sum_vars(&vars).ge_scalar(1.0), Some("min"))
            .unwrap();
        model
            .add_objective(Expr::term(vars[1], 4.0), 0, 1.0, Some("a"))
            .unwrap();
        model
            .add_objective(sum_vars(&vars), 1, -1.0, Some("b"))
            .unwrap();

        let solution = Solution::from_primal(&model, vec![1.0, 1.0], SolverStatus::Optimal);
        assert_eq!(solution.row_values, vec![2.0]);
        assert_eq!(solution.objective_values, vec![4.0, 2.0]);
        assert_eq!(solution.get_objective_value(1), Some(2.0));
        assert_eq!(solution.get_primal(2), None);
        assert!(solution.is_optimal());
    }
}
