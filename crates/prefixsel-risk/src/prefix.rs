//! Column-wise prefix aggregation of weighted risk.
//!
//! For column `j`, the prefix set holds every row up to and including the
//! first row whose binary value is 1, or every row when the column has no
//! risk at all. Only weighted cells inside the prefix set count toward the
//! aggregate, which keeps the aggregate linear in the row selection.

use crate::error::RiskError;
use crate::matrix::{BinaryMatrix, WeightedRiskMatrix};
use prefixsel_expr::{Expr, VariableId};
use std::ops::Range;
use std::time::Instant;
use tracing::{debug, trace};

/// Rows of one column that count toward the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixSet {
    pub column: usize,
    /// First row with a binary 1, if any.
    pub first_risk_row: Option<usize>,
    /// Exclusive end of the prefix.
    pub end: usize,
}

impl PrefixSet {
    pub fn rows(&self) -> Range<usize> {
        0..self.end
    }

    pub fn contains(&self, row: usize) -> bool {
        row < self.end
    }

    pub fn len(&self) -> usize {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end == 0
    }
}

/// Per-row coefficients of the aggregate risk expression.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixRisk {
    prefix_sets: Vec<PrefixSet>,
    coefficients: Vec<f64>,
}

impl PrefixRisk {
    pub fn prefix_sets(&self) -> &[PrefixSet] {
        &self.prefix_sets
    }

    pub fn prefix_set(&self, column: usize) -> Option<&PrefixSet> {
        self.prefix_sets.get(column)
    }

    /// `coefficients[i] = Σ_j weighted[i][j]` over columns whose prefix contains `i`.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn num_rows(&self) -> usize {
        self.coefficients.len()
    }

    /// Aggregate risk of a 0/1 selection.
    pub fn evaluate(&self, selection: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(selection)
            .map(|(coeff, value)| coeff * value)
            .sum()
    }

    /// Linear expression `Σ coefficients[i] * vars[i]`.
    ///
    /// # Errors
    ///
    /// Fails when `vars` does not hold exactly one variable per row.
    pub fn expression(&self, vars: &[VariableId]) -> Result<Expr, RiskError> {
        if vars.len() != self.coefficients.len() {
            return Err(RiskError::LengthMismatch {
                columns: self.coefficients.len(),
                weights: vars.len(),
            });
        }
        let mut expr = Expr::default();
        for (var, coeff) in vars.iter().zip(&self.coefficients) {
            expr.push_term(*var, *coeff);
        }
        Ok(expr)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixRiskAggregator;

impl PrefixRiskAggregator {
    pub fn new() -> Self {
        Self
    }

    /// One prefix set per column, each found with a single scan.
    pub fn prefix_sets(&self, binary: &BinaryMatrix) -> Vec<PrefixSet> {
        (0..binary.num_columns())
            .map(|column| {
                let first_risk_row =
                    (0..binary.num_rows()).find(|row| binary.is_set(*row, column));
                let end = first_risk_row.map_or(binary.num_rows(), |row| row + 1);
                trace!(
                    component = "risk",
                    operation = "prefix_set",
                    status = "success",
                    column = column as u64,
                    first_risk_row = ?first_risk_row,
                    end = end as u64,
                    "Computed prefix set"
                );
                PrefixSet {
                    column,
                    first_risk_row,
                    end,
                }
            })
            .collect()
    }

    /// Fold the weighted matrix into per-row coefficients.
    ///
    /// # Errors
    ///
    /// Fails when the two matrices differ in shape.
    pub fn aggregate(
        &self,
        binary: &BinaryMatrix,
        weighted: &WeightedRiskMatrix,
    ) -> Result<PrefixRisk, RiskError> {
        if binary.num_columns() != weighted.num_columns() {
            return Err(RiskError::LengthMismatch {
                columns: binary.num_columns(),
                weights: weighted.num_columns(),
            });
        }
        if binary.num_rows() != weighted.num_rows() {
            return Err(RiskError::RaggedMatrix {
                row: weighted.num_rows(),
                expected: binary.num_rows(),
                found: weighted.num_rows(),
            });
        }

        let started = Instant::now();
        let prefix_sets = self.prefix_sets(binary);
        let mut coefficients = vec![0.0; binary.num_rows()];
        for set in &prefix_sets {
            for row in set.rows() {
                coefficients[row] += weighted.get(row, set.column).unwrap_or(0.0);
            }
        }

        debug!(
            component = "risk",
            operation = "aggregate",
            status = "success",
            rows = binary.num_rows() as u64,
            columns = binary.num_columns() as u64,
            riskless_columns = prefix_sets
                .iter()
                .filter(|set| set.first_risk_row.is_none())
                .count() as u64,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Aggregated prefix risk"
        );

        Ok(PrefixRisk {
            prefix_sets,
            coefficients,
        })
    }
}
