//! The solver-independent [`Model`].
//!
//! - [`builder`]: adding variables, rows and objectives
//! - [`storage`]: read access, row views and objective tiers
//! - [`metadata`]: names and per-variable JSON
//! - [`error`]: [`ModelError`]

mod builder;
mod error;
mod metadata;
mod storage;

use crate::types::{Constraint, ObjectiveSpec, Sense, Variable};
use prefixsel_expr::{ConstraintId, Expr, VariableId};
use std::collections::BTreeMap;
use std::time::Instant;

pub use error::ModelError;
pub use storage::ObjectiveTier;

/// Mixed-integer linear program with any number of prioritized objectives.
///
/// Ids are dense: the n-th variable added is `VariableId::new(n)`, and the
/// same holds for constraints. Coefficients are stored per column.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) name: Option<String>,
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) sense: Sense,
    pub(crate) objectives: Vec<ObjectiveSpec>,
    /// variable -> (constraint, coefficient), constraints ascending
    pub(crate) columns: BTreeMap<VariableId, Vec<(ConstraintId, f64)>>,
    pub(crate) variable_names: Option<BTreeMap<VariableId, String>>,
    pub(crate) constraint_names: Option<BTreeMap<ConstraintId, String>>,
    pub(crate) variable_metadata: Option<BTreeMap<VariableId, serde_json::Value>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty model carrying `name` into logs and reports.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        match self.variables.get(id.index()) {
            Some(_) => Ok(()),
            None => Err(ModelError::InvalidVariableId(id)),
        }
    }

    pub(crate) fn ensure_constraint_exists(&self, id: ConstraintId) -> Result<(), ModelError> {
        match self.constraints.get(id.index()) {
            Some(_) => Ok(()),
            None => Err(ModelError::InvalidConstraintId(id)),
        }
    }

    /// Fold repeated variables and drop zero coefficients.
    pub(crate) fn normalize_terms(&self, terms: Vec<(VariableId, f64)>) -> Vec<(VariableId, f64)> {
        let started = Instant::now();
        let terms_in = terms.len();
        let folded = Expr::from_linear(terms).normalized_terms();
        tracing::trace!(
            component = "model",
            operation = "lower_expr",
            status = "success",
            terms_in,
            terms_out = folded.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Folded expression terms"
        );
        folded
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::Bounds;
    use prefixsel_expr::{Expr, sum_vars};
    use support::{bounded_constraint, selection_rows, unit_variable};

    mod metadata;
    mod objectives;
    mod support;

    #[test]
    fn fresh_model_has_nothing() {
        let model = Model::named("NFMOLE");
        assert_eq!(model.name(), Some("NFMOLE"));
        assert_eq!(
            (model.num_variables(), model.num_constraints(), model.num_coefficients()),
            (0, 0, 0)
        );
        assert!(model.objectives().is_empty());
        assert!(Model::new().name().is_none());
    }

    #[test]
    fn selection_variables_are_dense_binaries() {
        let mut model = Model::new();
        let rows = selection_rows(&mut model, 4);
        let indices: Vec<u32> = rows.iter().map(|id| id.inner()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        let last = model.get_variable(rows[3]).unwrap();
        assert!(last.is_integer);
        assert_eq!((last.bounds.lower, last.bounds.upper), (0.0, 1.0));
    }

    #[test]
    fn monotonic_rows_are_stored_per_column() {
        let mut model = Model::new();
        let rows = selection_rows(&mut model, 3);
        // rows[r] - rows[r-1] <= 0
        let first = model
            .add_constraint_expr(Expr::var(rows[1]).le_expr(&Expr::var(rows[0])), None)
            .unwrap();
        let second = model
            .add_constraint_expr(Expr::var(rows[2]).le_expr(&Expr::var(rows[1])), None)
            .unwrap();

        assert_eq!(model.get_column(rows[1]).unwrap(), &vec![(first, 1.0), (second, -1.0)]);
        assert_eq!(model.num_coefficients(), 4);
        assert_eq!(model.rows()[second.index()], vec![(rows[1], -1.0), (rows[2], 1.0)]);
        assert_eq!(model.row_activity(first, &[1.0, 1.0, 0.0]), 0.0);
        assert_eq!(model.row_activity(second, &[1.0, 1.0, 0.0]), -1.0);
    }

    #[test]
    fn set_coefficient_overwrites_and_validates() {
        let mut model = Model::new();
        let x = model.add_variable(unit_variable()).unwrap();
        let c = model.add_constraint(bounded_constraint(0.0, 1.0)).unwrap();
        model.set_coefficient(x, c, 2.0).unwrap();
        model.set_coefficient(x, c, 0.5).unwrap();
        assert_eq!(model.get_column(x).unwrap(), &vec![(c, 0.5)]);

        let missing = VariableId::new(9);
        assert_eq!(
            model.set_coefficient(missing, c, 1.0),
            Err(ModelError::InvalidVariableId(missing))
        );
        assert!(matches!(
            model.set_coefficient(x, c, f64::INFINITY),
            Err(ModelError::InvalidCoefficient { .. })
        ));
    }

    #[test]
    fn minimum_rows_constraint_is_one_sided() {
        let mut model = Model::new();
        let rows = selection_rows(&mut model, 2);
        let con = model
            .add_constraint_expr(sum_vars(&rows).ge_scalar(1.0), Some("min_selected_rows"))
            .unwrap();
        let stored = model.get_constraint(con).unwrap();
        assert_eq!(stored.bounds.lower, 1.0);
        assert!(stored.bounds.upper.is_infinite());
        assert_eq!(model.get_constraint_name(con), Some("min_selected_rows"));
    }

    #[test]
    fn repeated_terms_fold_into_one_coefficient() {
        let mut model = Model::new();
        let x = model.add_variable(unit_variable()).unwrap();
        let expr = Expr::term(x, 1.0) + Expr::term(x, 2.0);
        let con = model.add_constraint_expr(expr.le_scalar(2.0), None).unwrap();
        assert_eq!(model.rows()[con.index()], vec![(x, 3.0)]);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut model = Model::new();
        assert!(matches!(
            model.add_variable(Variable::continuous(Bounds::new(1.0, 0.0))),
            Err(ModelError::InvalidVariableBounds { .. })
        ));
        assert!(matches!(
            model.add_constraint(bounded_constraint(3.0, 2.0)),
            Err(ModelError::InvalidConstraintBounds { .. })
        ));
        assert_eq!(model.num_variables(), 0);
    }

    #[test]
    fn errors_render_with_code() {
        let err = ModelError::InvalidVariableId(VariableId::new(4));
        assert_eq!(err.code(), "VARIABLE_INVALID_ID");
        assert!(err.to_string().starts_with("[VARIABLE_INVALID_ID]"));
    }
}
