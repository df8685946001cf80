//! Bounded sub-sampling of a raw table.

use crate::error::RiskError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_SAMPLE_ROWS: usize = 500;
pub const DEFAULT_SAMPLE_COLUMNS: usize = 500;

/// How rows and columns are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleMode {
    /// First `rows` rows, then the first `columns` fields of each.
    #[default]
    Truncate,
    /// Rows drawn without replacement; each drawn row then draws its own
    /// columns without replacement, so columns no longer line up across rows.
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleConfig {
    pub rows: usize,
    pub columns: usize,
    pub mode: SampleMode,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_SAMPLE_ROWS,
            columns: DEFAULT_SAMPLE_COLUMNS,
            mode: SampleMode::Truncate,
        }
    }
}

/// Reduces a table to at most `rows` x `columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatrixSampler {
    config: SampleConfig,
}

impl MatrixSampler {
    pub fn new(config: SampleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    /// Sample `table`, cloning the chosen cells.
    ///
    /// # Errors
    ///
    /// Random mode fails with [`RiskError::SampleSizeExceeded`] when more rows
    /// or columns are requested than a table or row holds. Truncate mode
    /// never fails.
    pub fn sample<T: Clone>(&self, table: &[Vec<T>]) -> Result<Vec<Vec<T>>, RiskError> {
        let sampled = match self.config.mode {
            SampleMode::Truncate => self.truncate(table),
            SampleMode::Random { seed } => self.random(table, seed)?,
        };
        debug!(
            component = "risk",
            operation = "sample",
            status = "success",
            mode = self.mode_name(),
            input_rows = table.len() as u64,
            rows = sampled.len() as u64,
            columns = sampled.first().map_or(0, Vec::len) as u64,
            "Sampled risk table"
        );
        Ok(sampled)
    }

    fn mode_name(&self) -> &'static str {
        match self.config.mode {
            SampleMode::Truncate => "truncate",
            SampleMode::Random { .. } => "random",
        }
    }

    fn truncate<T: Clone>(&self, table: &[Vec<T>]) -> Vec<Vec<T>> {
        table
            .iter()
            .take(self.config.rows)
            .map(|row| row.iter().take(self.config.columns).cloned().collect())
            .collect()
    }

    fn random<T: Clone>(
        &self,
        table: &[Vec<T>],
        seed: Option<u64>,
    ) -> Result<Vec<Vec<T>>, RiskError> {
        warn!(
            component = "risk",
            operation = "sample",
            status = "warn",
            seed = ?seed,
            "Random sampling draws columns per row; column alignment across rows is lost"
        );
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        if self.config.rows > table.len() {
            return Err(RiskError::SampleSizeExceeded {
                axis: "rows",
                requested: self.config.rows,
                available: table.len(),
            });
        }
        let row_indices = index::sample(&mut rng, table.len(), self.config.rows);

        let mut sampled = Vec::with_capacity(self.config.rows);
        for row_idx in row_indices.iter() {
            let row = &table[row_idx];
            if self.config.columns > row.len() {
                return Err(RiskError::SampleSizeExceeded {
                    axis: "columns",
                    requested: self.config.columns,
                    available: row.len(),
                });
            }
            let column_indices = index::sample(&mut rng, row.len(), self.config.columns);
            sampled.push(column_indices.iter().map(|c| row[c].clone()).collect());
        }
        Ok(sampled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: usize, columns: usize) -> Vec<Vec<usize>> {
        (0..rows)
            .map(|i| (0..columns).map(|j| i * columns + j).collect())
            .collect()
    }

    fn sampler(rows: usize, columns: usize, mode: SampleMode) -> MatrixSampler {
        MatrixSampler::new(SampleConfig {
            rows,
            columns,
            mode,
        })
    }

    #[test]
    fn truncate_takes_leading_rows_and_columns() {
        let sampled = sampler(2, 3, SampleMode::Truncate)
            .sample(&table(4, 5))
            .unwrap();
        assert_eq!(sampled, vec![vec![0, 1, 2], vec![5, 6, 7]]);
    }

    #[test]
    fn truncate_is_silent_when_table_is_smaller() {
        let sampled = MatrixSampler::default().sample(&table(3, 2)).unwrap();
        assert_eq!(sampled, table(3, 2));
    }

    #[test]
    fn random_sampling_is_reproducible_with_seed() {
        let s = sampler(3, 2, SampleMode::Random { seed: Some(7) });
        let data = table(10, 6);
        let first = s.sample(&data).unwrap();
        let second = s.sample(&data).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn random_sampling_draws_without_replacement() {
        let s = sampler(5, 4, SampleMode::Random { seed: Some(1) });
        let data = table(5, 4);
        let sampled = s.sample(&data).unwrap();

        // every original row appears exactly once, each as a permutation of itself
        let mut row_ids: Vec<usize> = sampled.iter().map(|row| row[0] / 4).collect();
        row_ids.sort_unstable();
        assert_eq!(row_ids, vec![0, 1, 2, 3, 4]);
        for row in &sampled {
            let mut values = row.clone();
            values.sort_unstable();
            let base = values[0];
            assert_eq!(values, vec![base, base + 1, base + 2, base + 3]);
        }
    }

    #[test]
    fn random_sampling_rejects_oversized_requests() {
        let err = sampler(4, 1, SampleMode::Random { seed: Some(0) })
            .sample(&table(3, 2))
            .unwrap_err();
        assert_eq!(
            err,
            RiskError::SampleSizeExceeded {
                axis: "rows",
                requested: 4,
                available: 3
            }
        );

        let err = sampler(1, 3, SampleMode::Random { seed: Some(0) })
            .sample(&table(3, 2))
            .unwrap_err();
        assert_eq!(
            err,
            RiskError::SampleSizeExceeded {
                axis: "columns",
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn config_deserializes_modes() {
        let config: SampleConfig =
            serde_json::from_str(r#"{"rows": 10, "mode": {"random": {"seed": 3}}}"#).unwrap();
        assert_eq!(config.rows, 10);
        assert_eq!(config.columns, DEFAULT_SAMPLE_COLUMNS);
        assert_eq!(config.mode, SampleMode::Random { seed: Some(3) });

        let config: SampleConfig = serde_json::from_str(r#"{"mode": "truncate"}"#).unwrap();
        assert_eq!(config, SampleConfig::default());
    }
}
