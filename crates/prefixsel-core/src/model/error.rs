//! Model error types.

use prefixsel_expr::{ConstraintId, VariableId};
use thiserror::Error;

/// Errors that can occur during model operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Invalid variable ID
    #[error("[VARIABLE_INVALID_ID] Variable ID {} does not exist", .0.inner())]
    InvalidVariableId(VariableId),
    /// Invalid variable bounds
    #[error("[VARIABLE_INVALID_BOUNDS] Variable bounds invalid: lower ({lower}) > upper ({upper})")]
    InvalidVariableBounds { lower: f64, upper: f64 },
    /// Invalid constraint ID
    #[error("[CONSTRAINT_INVALID_ID] Constraint ID {} does not exist", .0.inner())]
    InvalidConstraintId(ConstraintId),
    /// Invalid constraint bounds
    #[error(
        "[CONSTRAINT_INVALID_BOUNDS] Constraint bounds invalid: lower ({lower}) > upper ({upper})"
    )]
    InvalidConstraintBounds { lower: f64, upper: f64 },
    /// Coefficient is NaN or infinite
    #[error("[COEFFICIENT_INVALID] Coefficient must be finite (got {coefficient})")]
    InvalidCoefficient { coefficient: f64 },
    /// Objective weight is NaN or infinite
    #[error("[OBJECTIVE_INVALID_WEIGHT] Objective weight must be finite (got {weight})")]
    InvalidObjectiveWeight { weight: f64 },
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InvalidVariableId(_) => "VARIABLE_INVALID_ID",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidConstraintId(_) => "CONSTRAINT_INVALID_ID",
            ModelError::InvalidConstraintBounds { .. } => "CONSTRAINT_INVALID_BOUNDS",
            ModelError::InvalidCoefficient { .. } => "COEFFICIENT_INVALID",
            ModelError::InvalidObjectiveWeight { .. } => "OBJECTIVE_INVALID_WEIGHT",
        }
    }
}
