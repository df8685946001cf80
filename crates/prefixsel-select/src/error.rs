//! Selection error types.

use prefixsel_core::{ModelError, SolverError};
use prefixsel_risk::RiskError;
use thiserror::Error;

/// Errors raised by the selection pipeline.
///
/// Non-optimal solver outcomes are not errors; they are reported through
/// [`crate::SelectionOutcome`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// The problem cannot be built as requested.
    #[error("[SELECTION_PRECONDITION] {0}")]
    Precondition(String),
    /// A configuration value is out of range.
    #[error("[SELECTION_INVALID_CONFIG] {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error(transparent)]
    Risk(#[from] RiskError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl SelectionError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SelectionError::Precondition(_) => "SELECTION_PRECONDITION",
            SelectionError::InvalidConfig { .. } => "SELECTION_INVALID_CONFIG",
            SelectionError::Risk(err) => err.code(),
            SelectionError::Model(err) => err.code(),
            SelectionError::Solver(err) => err.code(),
        }
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        SelectionError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_code() {
        let err: SelectionError = RiskError::EmptyMatrix { axis: "rows" }.into();
        assert_eq!(err.code(), "DATA_EMPTY_MATRIX");
        assert!(err.to_string().starts_with("[DATA_EMPTY_MATRIX]"));

        let err: SelectionError = SolverError::EmptyModel.into();
        assert_eq!(err.code(), "SOLVER_EMPTY_MODEL");
    }

    #[test]
    fn precondition_display() {
        let err = SelectionError::Precondition("minimum rows 4 exceeds 3 rows".to_string());
        assert_eq!(err.code(), "SELECTION_PRECONDITION");
        assert_eq!(
            err.to_string(),
            "[SELECTION_PRECONDITION] minimum rows 4 exceeds 3 rows"
        );
    }
}
