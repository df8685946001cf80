//! Builds the bi-objective prefix selection program.

use crate::config::{ObjectivePair, SelectionConfig};
use crate::error::SelectionError;
use prefixsel_core::{Model, Sense, Variable};
use prefixsel_expr::{ComparisonSense, ConstraintExpr, ConstraintId, Expr, VariableId, sum_vars};
use prefixsel_risk::{BinaryMatrix, PrefixRisk, WeightVector};
use serde_json::json;
use std::time::Instant;
use tracing::debug;

pub const SELECTION_VARIABLE: &str = "selected_rows";
pub const COVERAGE_OBJECTIVE: &str = "maxRisk";
pub const PARSIMONY_OBJECTIVE: &str = "minRows";
pub const MONOTONIC_CONSTRAINT: &str = "increment_rows";
pub const MIN_ROWS_CONSTRAINT: &str = "min_selected_rows";
pub const TARGET_CONSTRAINT: &str = "target_percentage";

/// Weight under which the row count is registered.
///
/// The program is maximized, so the count always enters with a non-positive
/// weight: `-|configured|`. Whatever sign is configured, more rows never
/// improve the parsimony objective.
pub fn parsimony_weight(configured: f64) -> f64 {
    -configured.abs()
}

/// A constraint added by the builder, kept for slack reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedConstraint {
    pub id: ConstraintId,
    pub label: String,
    pub sense: ComparisonSense,
    pub rhs: f64,
}

/// The built program together with the handles needed to read a solution.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    model: Model,
    selection: Vec<VariableId>,
    objectives: ObjectivePair<usize>,
    target_risk: Expr,
    coverage_target: f64,
    constraints: Vec<NamedConstraint>,
}

impl SelectionModel {
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// One binary variable per row, in row order.
    pub fn selection(&self) -> &[VariableId] {
        &self.selection
    }

    pub fn num_rows(&self) -> usize {
        self.selection.len()
    }

    /// Positions of the two objectives in `Model::objectives()`.
    pub fn objectives(&self) -> ObjectivePair<usize> {
        self.objectives
    }

    /// Aggregate prefix risk as a linear expression over the selection.
    pub fn target_risk(&self) -> &Expr {
        &self.target_risk
    }

    pub fn coverage_target(&self) -> f64 {
        self.coverage_target
    }

    pub fn constraints(&self) -> &[NamedConstraint] {
        &self.constraints
    }
}

/// Declares the selection variables, both objectives and the constraint set.
#[derive(Debug, Clone)]
pub struct SelectionModelBuilder {
    model_name: String,
    target_percentage: f64,
    minimum_rows: usize,
    weights: ObjectivePair<f64>,
    priorities: ObjectivePair<u32>,
}

impl SelectionModelBuilder {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            model_name: config.model_name.clone(),
            target_percentage: config.target_percentage,
            minimum_rows: config.minimum_rows,
            weights: config.objective_weights,
            priorities: config.objective_priorities,
        }
    }

    /// Reject a table with no rows or an empty first row before any cell is
    /// looked at.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Precondition`] naming the missing axis.
    pub fn check_table<T>(table: &[Vec<T>]) -> Result<(), SelectionError> {
        match table.first() {
            None => Err(SelectionError::Precondition(
                "risk matrix has no rows".to_string(),
            )),
            Some(first) if first.is_empty() => Err(SelectionError::Precondition(
                "risk matrix has no columns".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }

    /// Reject inputs that cannot form a valid program.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Precondition`] for a weight count that
    /// differs from the column count, or `minimum_rows` above the row count.
    pub fn check_preconditions(
        &self,
        binary: &BinaryMatrix,
        weights: &WeightVector,
    ) -> Result<(), SelectionError> {
        let rows = binary.num_rows();
        if weights.len() != binary.num_columns() {
            return Err(SelectionError::Precondition(format!(
                "risk matrix has {} columns but {} weights",
                binary.num_columns(),
                weights.len()
            )));
        }
        if self.minimum_rows > rows {
            return Err(SelectionError::Precondition(format!(
                "minimum rows {} exceeds the {} available rows",
                self.minimum_rows, rows
            )));
        }
        Ok(())
    }

    /// Assemble the program.
    ///
    /// # Errors
    ///
    /// Fails on any precondition from [`Self::check_preconditions`], when
    /// `risk` was aggregated for a different row count, or on a model error.
    pub fn build(
        &self,
        binary: &BinaryMatrix,
        weights: &WeightVector,
        risk: &PrefixRisk,
    ) -> Result<SelectionModel, SelectionError> {
        self.check_preconditions(binary, weights)?;
        let rows = binary.num_rows();
        if risk.num_rows() != rows {
            return Err(SelectionError::Precondition(format!(
                "prefix risk covers {} rows but the matrix has {}",
                risk.num_rows(),
                rows
            )));
        }

        let started = Instant::now();
        let mut model = Model::named(self.model_name.clone());
        model.set_sense(Sense::Maximize);

        let selection = model.add_variables(rows, Variable::binary())?;
        for (row, var) in selection.iter().enumerate() {
            model.set_variable_name(*var, format!("{SELECTION_VARIABLE}[{row}]"))?;
            model.set_variable_metadata(*var, json!({ "row": row }))?;
        }

        let target_risk = risk.expression(&selection)?;
        let row_count = sum_vars(&selection);
        let coverage_target = weights.coverage_target(self.target_percentage);

        let objectives = ObjectivePair {
            coverage: model.add_objective(
                target_risk.clone(),
                self.priorities.coverage,
                self.weights.coverage,
                Some(COVERAGE_OBJECTIVE),
            )?,
            parsimony: model.add_objective(
                row_count.clone(),
                self.priorities.parsimony,
                parsimony_weight(self.weights.parsimony),
                Some(PARSIMONY_OBJECTIVE),
            )?,
        };

        let mut constraints = Vec::with_capacity(rows + 1);
        for (row, pair) in selection.windows(2).enumerate() {
            let expr = Expr::var(pair[1]).le_expr(&Expr::var(pair[0]));
            constraints.push(add_named(
                &mut model,
                expr,
                MONOTONIC_CONSTRAINT,
                format!("{MONOTONIC_CONSTRAINT}[{}]", row + 1),
            )?);
        }
        constraints.push(add_named(
            &mut model,
            row_count.ge_scalar(self.minimum_rows as f64),
            MIN_ROWS_CONSTRAINT,
            MIN_ROWS_CONSTRAINT.to_string(),
        )?);
        constraints.push(add_named(
            &mut model,
            target_risk.ge_scalar(coverage_target),
            TARGET_CONSTRAINT,
            TARGET_CONSTRAINT.to_string(),
        )?);

        debug!(
            component = "select",
            operation = "build_model",
            status = "success",
            model = self.model_name.as_str(),
            rows = rows as u64,
            constraints = model.num_constraints() as u64,
            risk_terms = target_risk.linear_terms().len() as u64,
            coverage_target,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Built selection model"
        );

        Ok(SelectionModel {
            model,
            selection,
            objectives,
            target_risk,
            coverage_target,
            constraints,
        })
    }
}

fn add_named(
    model: &mut Model,
    constraint: ConstraintExpr,
    name: &str,
    label: String,
) -> Result<NamedConstraint, SelectionError> {
    let sense = constraint.sense();
    let rhs = constraint.rhs();
    let id = model.add_constraint_expr(constraint, Some(name))?;
    Ok(NamedConstraint {
        id,
        label,
        sense,
        rhs,
    })
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use prefixsel_risk::{PrefixRiskAggregator, WeightedRiskMatrix};

    fn inputs(rows: Vec<Vec<f64>>, weights: Vec<f64>) -> (BinaryMatrix, WeightVector, PrefixRisk) {
        let binary = BinaryMatrix::try_from_rows(rows).unwrap();
        let weights = WeightVector::new(weights).unwrap();
        let weighted = WeightedRiskMatrix::new(&binary, &weights).unwrap();
        let risk = PrefixRiskAggregator::new()
            .aggregate(&binary, &weighted)
            .unwrap();
        (binary, weights, risk)
    }

    fn scenario_a() -> (BinaryMatrix, WeightVector, PrefixRisk) {
        inputs(
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
            vec![2.0, 2.0],
        )
    }

    #[test]
    fn parsimony_weight_is_always_non_positive() {
        assert_eq!(parsimony_weight(1.0), -1.0);
        assert_eq!(parsimony_weight(-3.0), -3.0);
        assert_eq!(parsimony_weight(0.0), 0.0);
    }

    #[test]
    fn builds_variables_objectives_and_constraints() {
        let (binary, weights, risk) = scenario_a();
        let config = SelectionConfig::new()
            .with_target_percentage(0.5)
            .with_minimum_rows(1);
        let built = SelectionModelBuilder::new(&config)
            .build(&binary, &weights, &risk)
            .unwrap();
        let model = built.model();

        assert_eq!(model.name(), Some("NFMOLE"));
        assert_eq!(model.sense(), Sense::Maximize);
        assert_eq!(built.num_rows(), 3);
        assert_eq!(model.get_variable_name(built.selection()[2]), Some("selected_rows[2]"));
        assert_eq!(
            model.get_variable_metadata(built.selection()[1]),
            Some(&json!({ "row": 1 }))
        );
        assert!(model.variables().all(|(_, var)| *var == Variable::binary()));

        let objectives = model.objectives();
        let coverage = &objectives[built.objectives().coverage];
        let parsimony = &objectives[built.objectives().parsimony];
        assert_eq!(coverage.name.as_deref(), Some("maxRisk"));
        assert_eq!((coverage.priority, coverage.weight), (1, 1.0));
        assert_eq!(parsimony.name.as_deref(), Some("minRows"));
        assert_eq!((parsimony.priority, parsimony.weight), (0, -1.0));

        // two monotonic rows, minimum rows, coverage threshold
        assert_eq!(model.num_constraints(), 4);
        assert_eq!(model.constraints_named(MONOTONIC_CONSTRAINT).len(), 2);
        assert_eq!(built.coverage_target(), 1.0);
        let target = built.constraints().last().unwrap();
        assert_eq!(target.label, "target_percentage");
        assert_eq!(target.sense, ComparisonSense::GreaterEqual);
        assert_eq!(target.rhs, 1.0);
    }

    #[test]
    fn monotonic_rows_forbid_gaps() {
        let (binary, weights, risk) = scenario_a();
        let built = SelectionModelBuilder::new(&SelectionConfig::new())
            .build(&binary, &weights, &risk)
            .unwrap();
        let monotonic: Vec<_> = built
            .constraints()
            .iter()
            .filter(|c| c.label.starts_with(MONOTONIC_CONSTRAINT))
            .collect();
        let gap = [1.0, 0.0, 1.0];
        let prefix = [1.0, 1.0, 0.0];
        let model = built.model();
        let violated = |values: &[f64]| {
            monotonic
                .iter()
                .any(|c| c.sense.slack(model.row_activity(c.id, values), c.rhs) < 0.0)
        };
        assert!(violated(&gap));
        assert!(!violated(&prefix));
        assert_eq!(monotonic[0].label, "increment_rows[1]");
    }

    #[test]
    fn target_risk_matches_prefix_coefficients() {
        let (binary, weights, risk) = scenario_a();
        let built = SelectionModelBuilder::new(&SelectionConfig::new())
            .build(&binary, &weights, &risk)
            .unwrap();
        assert_eq!(built.target_risk().evaluate(&[1.0, 0.0, 0.0]), 2.0);
        assert_eq!(built.target_risk().evaluate(&[1.0, 1.0, 1.0]), 4.0);
    }

    #[test]
    fn single_row_has_no_monotonic_constraints() {
        let (binary, weights, risk) = inputs(vec![vec![1.0, 0.0]], vec![1.0, 1.0]);
        let built = SelectionModelBuilder::new(&SelectionConfig::new())
            .build(&binary, &weights, &risk)
            .unwrap();
        assert!(built.model().constraints_named(MONOTONIC_CONSTRAINT).is_empty());
        assert_eq!(built.model().num_constraints(), 2);
    }

    #[test]
    fn minimum_rows_above_row_count_is_a_precondition_error() {
        let (binary, weights, risk) = scenario_a();
        let config = SelectionConfig::new().with_minimum_rows(4);
        let err = SelectionModelBuilder::new(&config)
            .build(&binary, &weights, &risk)
            .unwrap_err();
        assert_eq!(err.code(), "SELECTION_PRECONDITION");
    }

    #[test]
    fn weight_count_must_match_columns() {
        let (binary, _, risk) = scenario_a();
        let weights = WeightVector::new(vec![1.0, 1.0, 1.0]).unwrap();
        let err = SelectionModelBuilder::new(&SelectionConfig::new())
            .build(&binary, &weights, &risk)
            .unwrap_err();
        assert!(matches!(err, SelectionError::Precondition(_)));
    }

    #[test]
    fn empty_tables_are_precondition_errors() {
        let no_rows: Vec<Vec<f64>> = Vec::new();
        let err = SelectionModelBuilder::check_table(&no_rows).unwrap_err();
        assert_eq!(err.to_string(), "[SELECTION_PRECONDITION] risk matrix has no rows");
        let err = SelectionModelBuilder::check_table(&[Vec::<f64>::new()]).unwrap_err();
        assert_eq!(err.code(), "SELECTION_PRECONDITION");
        assert!(SelectionModelBuilder::check_table(&[vec!["0.7"]]).is_ok());
    }
}
