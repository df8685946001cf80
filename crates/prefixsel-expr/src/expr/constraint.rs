//! Constraint expressions: linear expression with comparison sense and RHS.

use crate::expr::core::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "<=",
            ComparisonSense::GreaterEqual => ">=",
            ComparisonSense::Equal => "=",
        }
    }

    /// Distance by which `activity` satisfies `rhs` under this sense.
    ///
    /// Negative values mean the constraint is violated.
    pub fn slack(self, activity: f64, rhs: f64) -> f64 {
        match self {
            ComparisonSense::LessEqual => rhs - activity,
            ComparisonSense::GreaterEqual => activity - rhs,
            ComparisonSense::Equal => -(activity - rhs).abs(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintExpr {
    expr: Expr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    pub fn new(expr: Expr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (Expr, ComparisonSense, f64) {
        (self.expr, self.sense, self.rhs)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::VariableId;

    #[test]
    fn slack_sign_follows_sense() {
        assert_eq!(ComparisonSense::LessEqual.slack(3.0, 5.0), 2.0);
        assert_eq!(ComparisonSense::GreaterEqual.slack(3.0, 5.0), -2.0);
        assert_eq!(ComparisonSense::Equal.slack(5.0, 5.0), 0.0);
    }

    #[test]
    fn into_parts_keeps_moved_constant() {
        let c = Expr::new(vec![(VariableId::new(0), 1.0)], 2.0).ge_scalar(1.0);
        let (expr, sense, rhs) = c.into_parts();
        assert_eq!(expr.linear_terms(), &[(VariableId::new(0), 1.0)]);
        assert_eq!(sense, ComparisonSense::GreaterEqual);
        assert_eq!(rhs, -1.0);
    }
}
