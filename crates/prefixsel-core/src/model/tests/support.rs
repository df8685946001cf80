use crate::model::Model;
use crate::types::{Bounds, Constraint, Variable};
use prefixsel_expr::VariableId;

pub(super) fn unit_variable() -> Variable {
    Variable::continuous(Bounds::new(0.0, 1.0))
}

pub(super) fn bounded_constraint(lower: f64, upper: f64) -> Constraint {
    Constraint {
        bounds: Bounds::new(lower, upper),
    }
}

/// One binary per row, as a selection model declares them.
pub(super) fn selection_rows(model: &mut Model, count: usize) -> Vec<VariableId> {
    model.add_variables(count, Variable::binary()).unwrap()
}
