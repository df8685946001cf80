//! Builder functions for constructing linear expressions.

use crate::expr::core::Expr;
use crate::ids::VariableId;

/// Combines multiple expressions into a single expression by concatenating all their linear terms.
///
/// Duplicate variable terms are NOT merged; use `normalized_terms()` on the result
/// if term consolidation is needed. Constants are added.
pub fn linear_sum(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    let mut terms = Vec::new();
    let mut constant = 0.0;
    for expr in exprs {
        let (linear, c) = expr.into_parts();
        terms.extend(linear);
        constant += c;
    }
    Expr::new(terms, constant)
}

/// Sum of variables, each with coefficient 1.0.
pub fn sum_vars(vars: &[VariableId]) -> Expr {
    Expr::from_linear(vars.iter().map(|var| (*var, 1.0)).collect())
}
