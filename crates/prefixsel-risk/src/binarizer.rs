//! Threshold raw risk observations into a binary matrix.

use crate::error::RiskError;
use crate::matrix::{BinaryMatrix, RawMatrix};
use std::time::Instant;
use tracing::debug;

/// Values at or above this threshold count as a risk.
pub const RISK_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBinarizer {
    threshold: f64,
}

impl Default for RiskBinarizer {
    fn default() -> Self {
        Self {
            threshold: RISK_THRESHOLD,
        }
    }
}

impl RiskBinarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Map each cell to `1.0` when `raw >= threshold`, else `0.0`.
    ///
    /// The result is validated cell by cell before it is returned.
    ///
    /// # Errors
    ///
    /// Fails on empty or ragged input, on a NaN or infinite cell, or if a
    /// thresholded cell is not 0 or 1.
    pub fn binarize(&self, raw: &RawMatrix) -> Result<BinaryMatrix, RiskError> {
        let started = Instant::now();
        let columns = raw.rectangular_width()?;
        let rows = raw
            .rows()
            .iter()
            .enumerate()
            .map(|(row, values)| {
                values
                    .iter()
                    .enumerate()
                    .map(|(column, value)| self.classify(*value, row, column))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let binary = BinaryMatrix::try_from_rows(rows)?;

        debug!(
            component = "risk",
            operation = "binarize",
            status = "success",
            rows = binary.num_rows() as u64,
            columns = columns as u64,
            ones = binary.count_ones() as u64,
            threshold = self.threshold,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Binarized risk matrix"
        );
        Ok(binary)
    }

    fn classify(&self, value: f64, row: usize, column: usize) -> Result<f64, RiskError> {
        if !value.is_finite() {
            return Err(RiskError::InvalidNumber {
                row,
                column,
                field: value.to_string(),
            });
        }
        Ok(if value >= self.threshold { 1.0 } else { 0.0 })
    }
}
