//! Per-column weights and the coverage target derived from them.

use crate::error::RiskError;
use crate::matrix::parse_field;
use tracing::debug;

/// Fixed scaling from loaded weights to "real" weights in the coverage target.
pub const REAL_WEIGHT_SCALE: f64 = 0.5;

/// Finite, non-negative weights, one per matrix column once aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightVector {
    weights: Vec<f64>,
}

impl WeightVector {
    /// # Errors
    ///
    /// Fails with [`RiskError::InvalidWeight`] on a negative or non-finite entry.
    pub fn new(weights: Vec<f64>) -> Result<Self, RiskError> {
        if let Some((index, value)) = weights
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(RiskError::InvalidWeight { index, value });
        }
        Ok(Self { weights })
    }

    /// Flatten nested weight rows row-major.
    pub fn from_nested(rows: Vec<Vec<f64>>) -> Result<Self, RiskError> {
        Self::new(rows.into_iter().flatten().collect())
    }

    /// Parse and flatten text weight rows.
    pub fn parse<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, RiskError> {
        let mut weights = Vec::new();
        for (row, fields) in rows.iter().enumerate() {
            for (column, field) in fields.iter().enumerate() {
                weights.push(parse_field(field.as_ref(), row, column)?);
            }
        }
        Self::new(weights)
    }

    /// Truncate to `columns` entries.
    ///
    /// # Errors
    ///
    /// Fails with [`RiskError::LengthMismatch`] when fewer than `columns`
    /// weights are available. Missing weights are never padded.
    pub fn align(mut self, columns: usize) -> Result<Self, RiskError> {
        if self.weights.len() < columns {
            return Err(RiskError::LengthMismatch {
                columns,
                weights: self.weights.len(),
            });
        }
        let dropped = self.weights.len() - columns;
        self.weights.truncate(columns);
        debug!(
            component = "risk",
            operation = "align_weights",
            status = "success",
            columns = columns as u64,
            dropped = dropped as u64,
            "Aligned weights to matrix columns"
        );
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// `Σ weight * REAL_WEIGHT_SCALE`.
    pub fn real_total(&self) -> f64 {
        self.weights
            .iter()
            .map(|weight| weight * REAL_WEIGHT_SCALE)
            .sum()
    }

    /// Minimum aggregate risk a selection must reach.
    pub fn coverage_target(&self, target_percentage: f64) -> f64 {
        target_percentage * self.real_total()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn nested_weights_are_flattened_row_major() {
        let weights = WeightVector::from_nested(vec![vec![1.0, 2.0], vec![3.0]]).unwrap();
        assert_eq!(weights.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn parse_flattens_text_rows() {
        let weights = WeightVector::parse(&[vec!["1", " 2.5"], vec!["0"]]).unwrap();
        assert_eq!(weights.as_slice(), &[1.0, 2.5, 0.0]);
        let err = WeightVector::parse(&[vec!["1"], vec!["w"]]).unwrap_err();
        assert_eq!(
            err,
            RiskError::InvalidNumber {
                row: 1,
                column: 0,
                field: "w".to_string()
            }
        );
    }

    #[test]
    fn longer_vectors_are_truncated() {
        let weights = WeightVector::new(vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .align(2)
            .unwrap();
        assert_eq!(weights.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn short_vectors_fail() {
        // three weights against five columns
        let err = WeightVector::new(vec![1.0, 1.0, 1.0])
            .unwrap()
            .align(5)
            .unwrap_err();
        assert_eq!(
            err,
            RiskError::LengthMismatch {
                columns: 5,
                weights: 3
            }
        );
    }

    #[test]
    fn negative_and_nan_weights_are_rejected() {
        assert_eq!(
            WeightVector::new(vec![1.0, -0.5]),
            Err(RiskError::InvalidWeight {
                index: 1,
                value: -0.5
            })
        );
        assert_eq!(
            WeightVector::new(vec![f64::NAN]).unwrap_err().code(),
            "DATA_INVALID_WEIGHT"
        );
    }

    #[test]
    fn coverage_target_uses_halved_weights() {
        let weights = WeightVector::new(vec![2.0, 2.0]).unwrap();
        assert_eq!(weights.real_total(), 2.0);
        assert_eq!(weights.coverage_target(0.5), 1.0);
        assert_eq!(weights.coverage_target(1.0), 2.0);
    }
}
