//! Dense row-major matrices used by the risk pipeline.

use crate::error::RiskError;
use crate::weights::WeightVector;

/// Raw risk observations, one `Vec<f64>` per row.
///
/// Rows may differ in length until the matrix is binarized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMatrix {
    rows: Vec<Vec<f64>>,
}

impl RawMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Parse text fields as `f64`, trimming surrounding whitespace.
    pub fn parse<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, RiskError> {
        let parsed = rows
            .iter()
            .enumerate()
            .map(|(row, fields)| {
                fields
                    .iter()
                    .enumerate()
                    .map(|(column, field)| parse_field(field.as_ref(), row, column))
                    .collect::<Result<Vec<f64>, RiskError>>()
            })
            .collect::<Result<Vec<_>, RiskError>>()?;
        Ok(Self { rows: parsed })
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// Column count shared by every row.
    ///
    /// # Errors
    ///
    /// Fails on an empty matrix or on rows of different lengths.
    pub fn rectangular_width(&self) -> Result<usize, RiskError> {
        let first = self
            .rows
            .first()
            .ok_or(RiskError::EmptyMatrix { axis: "rows" })?;
        let expected = first.len();
        if expected == 0 {
            return Err(RiskError::EmptyMatrix { axis: "columns" });
        }
        for (row, values) in self.rows.iter().enumerate() {
            if values.len() != expected {
                return Err(RiskError::RaggedMatrix {
                    row,
                    expected,
                    found: values.len(),
                });
            }
        }
        Ok(expected)
    }
}

pub(crate) fn parse_field(field: &str, row: usize, column: usize) -> Result<f64, RiskError> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RiskError::InvalidNumber {
            row,
            column,
            field: field.to_string(),
        })
}

/// Rectangular matrix whose cells have been checked to be exactly 0 or 1.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMatrix {
    rows: usize,
    columns: usize,
    cells: Vec<f64>,
}

impl BinaryMatrix {
    /// Build from rows, scanning every cell.
    ///
    /// # Errors
    ///
    /// Fails on empty or ragged input, or when any cell is not 0 or 1.
    pub fn try_from_rows(rows: Vec<Vec<f64>>) -> Result<Self, RiskError> {
        let raw = RawMatrix::from_rows(rows);
        let columns = raw.rectangular_width()?;
        let num_rows = raw.num_rows();
        let cells: Vec<f64> = raw.into_rows().into_iter().flatten().collect();
        let matrix = Self {
            rows: num_rows,
            columns,
            cells,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Check every cell, reporting the first one that is not 0 or 1.
    pub fn validate(&self) -> Result<(), RiskError> {
        match self
            .cells
            .iter()
            .position(|value| *value != 0.0 && *value != 1.0)
        {
            Some(idx) => Err(RiskError::NonBinary {
                row: idx / self.columns,
                column: idx % self.columns,
                value: self.cells[idx],
            }),
            None => Ok(()),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    pub fn is_set(&self, row: usize, column: usize) -> bool {
        self.get(row, column) == Some(1.0)
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let start = row.checked_mul(self.columns)?;
        self.cells.get(start..start + self.columns)
    }

    /// Number of cells equal to 1.
    pub fn count_ones(&self) -> usize {
        self.cells.iter().filter(|value| **value == 1.0).count()
    }
}

/// `weighted[i][j] = binary[i][j] * weight[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRiskMatrix {
    rows: usize,
    columns: usize,
    cells: Vec<f64>,
}

impl WeightedRiskMatrix {
    /// Multiply each column of `binary` by its weight.
    ///
    /// # Errors
    ///
    /// Fails when the weight count differs from the column count.
    pub fn new(binary: &BinaryMatrix, weights: &WeightVector) -> Result<Self, RiskError> {
        if weights.len() != binary.num_columns() {
            return Err(RiskError::LengthMismatch {
                columns: binary.num_columns(),
                weights: weights.len(),
            });
        }
        let columns = binary.num_columns();
        let cells = binary
            .cells
            .chunks(columns)
            .flat_map(|row| {
                row.iter()
                    .zip(weights.as_slice())
                    .map(|(value, weight)| value * weight)
            })
            .collect();
        Ok(Self {
            rows: binary.num_rows(),
            columns,
            cells,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    /// Sum of every weighted cell.
    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_reports_position() {
        let rows = vec![vec![" 0.25", "1"], vec!["0.5", "abc"]];
        let err = RawMatrix::parse(&rows).unwrap_err();
        assert_eq!(
            err,
            RiskError::InvalidNumber {
                row: 1,
                column: 1,
                field: "abc".to_string()
            }
        );

        let ok = RawMatrix::parse(&[vec![" 0.25 ", "1"]]).unwrap();
        assert_eq!(ok.rows(), &[vec![0.25, 1.0]]);
    }

    #[test]
    fn parse_rejects_non_finite() {
        let err = RawMatrix::parse(&[vec!["inf"]]).unwrap_err();
        assert_eq!(err.code(), "DATA_INVALID_NUMBER");
    }

    #[test]
    fn rectangular_width_detects_shape_problems() {
        assert_eq!(
            RawMatrix::default().rectangular_width(),
            Err(RiskError::EmptyMatrix { axis: "rows" })
        );
        assert_eq!(
            RawMatrix::from_rows(vec![vec![]]).rectangular_width(),
            Err(RiskError::EmptyMatrix { axis: "columns" })
        );
        assert_eq!(
            RawMatrix::from_rows(vec![vec![1.0, 0.0], vec![1.0]]).rectangular_width(),
            Err(RiskError::RaggedMatrix {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn binary_matrix_rejects_fractional_cells() {
        let err = BinaryMatrix::try_from_rows(vec![vec![1.0, 0.0], vec![0.0, 0.3]]).unwrap_err();
        assert_eq!(
            err,
            RiskError::NonBinary {
                row: 1,
                column: 1,
                value: 0.3
            }
        );
    }

    #[test]
    fn binary_matrix_accessors() {
        let m = BinaryMatrix::try_from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(m.num_rows(), 2);
        assert_eq!(m.num_columns(), 2);
        assert!(m.is_set(1, 1));
        assert!(!m.is_set(0, 1));
        assert_eq!(m.get(0, 2), None);
        assert_eq!(m.row(1), Some(&[0.0, 1.0][..]));
        assert_eq!(m.row(2), None);
        assert_eq!(m.count_ones(), 2);
    }

    #[test]
    fn weighted_matrix_scales_columns() {
        let m = BinaryMatrix::try_from_rows(vec![vec![1.0, 1.0], vec![0.0, 1.0]]).unwrap();
        let weights = WeightVector::new(vec![2.0, 3.0]).unwrap();
        let weighted = WeightedRiskMatrix::new(&m, &weights).unwrap();
        assert_eq!(weighted.get(0, 0), Some(2.0));
        assert_eq!(weighted.get(0, 1), Some(3.0));
        assert_eq!(weighted.get(1, 0), Some(0.0));
        assert_eq!(weighted.total(), 8.0);
    }

    #[test]
    fn weighted_matrix_requires_aligned_weights() {
        let m = BinaryMatrix::try_from_rows(vec![vec![1.0, 1.0]]).unwrap();
        let weights = WeightVector::new(vec![2.0]).unwrap();
        assert_eq!(
            WeightedRiskMatrix::new(&m, &weights),
            Err(RiskError::LengthMismatch {
                columns: 2,
                weights: 1
            })
        );
    }
}
