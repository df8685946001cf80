//! Expression types for selection models.
//!
//! - `core`: Expr: linear terms + constant
//! - `constraint`: ConstraintExpr: expression with comparison sense and RHS
//! - `builders`: helpers for summing expressions and variables

pub mod builders;
pub mod constraint;
pub mod core;

pub use builders::{linear_sum, sum_vars};
pub use constraint::{ComparisonSense, ConstraintExpr};
pub use core::Expr;
