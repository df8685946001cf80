//! Risk data error types.

use thiserror::Error;

/// Errors raised while preparing risk data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// A binarized cell is neither 0 nor 1.
    #[error("[DATA_NON_BINARY] Risk data is not binary: cell ({row}, {column}) = {value}")]
    NonBinary { row: usize, column: usize, value: f64 },
    /// Fewer weights than matrix columns.
    #[error("[DATA_LENGTH_MISMATCH] Risk data has {columns} columns but only {weights} weights")]
    LengthMismatch { columns: usize, weights: usize },
    /// Matrix has no rows or no columns.
    #[error("[DATA_EMPTY_MATRIX] Risk matrix has no {axis}")]
    EmptyMatrix { axis: &'static str },
    /// Rows of different lengths.
    #[error("[DATA_RAGGED_MATRIX] Row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Random sampling asked for more items than exist.
    #[error("[DATA_SAMPLE_SIZE_EXCEEDED] Cannot sample {requested} {axis} from {available}")]
    SampleSizeExceeded {
        axis: &'static str,
        requested: usize,
        available: usize,
    },
    /// A field does not parse as a finite real number.
    #[error("[DATA_INVALID_NUMBER] Field ({row}, {column}) is not a finite number: {field:?}")]
    InvalidNumber {
        row: usize,
        column: usize,
        field: String,
    },
    /// A weight is negative or non-finite.
    #[error("[DATA_INVALID_WEIGHT] Weight {index} must be finite and non-negative (got {value})")]
    InvalidWeight { index: usize, value: f64 },
}

impl RiskError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            RiskError::NonBinary { .. } => "DATA_NON_BINARY",
            RiskError::LengthMismatch { .. } => "DATA_LENGTH_MISMATCH",
            RiskError::EmptyMatrix { .. } => "DATA_EMPTY_MATRIX",
            RiskError::RaggedMatrix { .. } => "DATA_RAGGED_MATRIX",
            RiskError::SampleSizeExceeded { .. } => "DATA_SAMPLE_SIZE_EXCEEDED",
            RiskError::InvalidNumber { .. } => "DATA_INVALID_NUMBER",
            RiskError::InvalidWeight { .. } => "DATA_INVALID_WEIGHT",
        }
    }

    /// True for the data integrity family (non-binary or unparsable cells).
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            RiskError::NonBinary { .. } | RiskError::InvalidNumber { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_code_prefix() {
        let err = RiskError::LengthMismatch {
            columns: 5,
            weights: 3,
        };
        assert_eq!(err.code(), "DATA_LENGTH_MISMATCH");
        assert!(err.to_string().starts_with("[DATA_LENGTH_MISMATCH]"));
        assert!(err.to_string().contains("5 columns"));
    }

    #[test]
    fn data_integrity_family() {
        assert!(
            RiskError::NonBinary {
                row: 0,
                column: 1,
                value: 0.5
            }
            .is_data_integrity()
        );
        assert!(
            RiskError::InvalidNumber {
                row: 0,
                column: 0,
                field: "x".to_string()
            }
            .is_data_integrity()
        );
        assert!(!RiskError::EmptyMatrix { axis: "rows" }.is_data_integrity());
    }
}
