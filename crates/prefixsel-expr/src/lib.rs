pub mod expr;
pub mod ids;

pub use expr::{ComparisonSense, ConstraintExpr, Expr, linear_sum, sum_vars};
pub use ids::{ConstraintId, VariableId};
