//! Selection configuration.

use crate::error::SelectionError;
use prefixsel_risk::SampleConfig;
use prefixsel_solver::SolverConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_PERCENTAGE: f64 = 0.7;
pub const DEFAULT_MINIMUM_ROWS: usize = 1;
pub const DEFAULT_MODEL_NAME: &str = "NFMOLE";

/// One value per objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectivePair<T> {
    /// Aggregate prefix risk.
    pub coverage: T,
    /// Number of selected rows.
    pub parsimony: T,
}

impl<T> ObjectivePair<T> {
    pub fn new(coverage: T, parsimony: T) -> Self {
        Self {
            coverage,
            parsimony,
        }
    }
}

fn default_weights() -> ObjectivePair<f64> {
    ObjectivePair::new(1.0, 1.0)
}

/// Parsimony is optimized first so that the shortest qualifying prefix wins.
fn default_priorities() -> ObjectivePair<u32> {
    ObjectivePair::new(1, 0)
}

/// Immutable options for one selection run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Fraction of the real weight total the prefix must cover, in `(0, 1]`.
    pub target_percentage: f64,
    pub minimum_rows: usize,
    /// Weights scale objectives within a priority tier. Finite, non-negative.
    #[serde(default = "default_weights")]
    pub objective_weights: ObjectivePair<f64>,
    /// Lower priority indices are solved first.
    #[serde(default = "default_priorities")]
    pub objective_priorities: ObjectivePair<u32>,
    pub model_name: String,
    pub sample: SampleConfig,
    pub solver: SolverConfig,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            target_percentage: DEFAULT_TARGET_PERCENTAGE,
            minimum_rows: DEFAULT_MINIMUM_ROWS,
            objective_weights: default_weights(),
            objective_priorities: default_priorities(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            sample: SampleConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl SelectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_percentage(mut self, target_percentage: f64) -> Self {
        self.target_percentage = target_percentage;
        self
    }

    pub fn with_minimum_rows(mut self, minimum_rows: usize) -> Self {
        self.minimum_rows = minimum_rows;
        self
    }

    pub fn with_objective_weights(mut self, coverage: f64, parsimony: f64) -> Self {
        self.objective_weights = ObjectivePair::new(coverage, parsimony);
        self
    }

    pub fn with_objective_priorities(mut self, coverage: u32, parsimony: u32) -> Self {
        self.objective_priorities = ObjectivePair::new(coverage, parsimony);
        self
    }

    pub fn with_sample(mut self, sample: SampleConfig) -> Self {
        self.sample = sample;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SelectionError> {
        let pct = self.target_percentage;
        if !(pct > 0.0 && pct <= 1.0) {
            return Err(SelectionError::invalid_config(
                "target_percentage",
                format!("must be in (0, 1], got {pct}"),
            ));
        }
        for (field, weight) in [
            ("objective_weights.coverage", self.objective_weights.coverage),
            ("objective_weights.parsimony", self.objective_weights.parsimony),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SelectionError::invalid_config(
                    field,
                    format!("must be finite and non-negative, got {weight}"),
                ));
            }
        }
        if self.sample.rows == 0 || self.sample.columns == 0 {
            return Err(SelectionError::invalid_config(
                "sample",
                "rows and columns must be positive",
            ));
        }
        if let Some(tolerance) = self.solver.objective_tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(SelectionError::invalid_config(
                    "solver.objective_tolerance",
                    format!("must be finite and non-negative, got {tolerance}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use prefixsel_risk::SampleMode;

    #[test]
    fn defaults() {
        let config = SelectionConfig::default();
        assert_eq!(config.target_percentage, 0.7);
        assert_eq!(config.minimum_rows, 1);
        assert_eq!(config.objective_weights, ObjectivePair::new(1.0, 1.0));
        assert_eq!(config.objective_priorities, ObjectivePair::new(1, 0));
        assert_eq!(config.model_name, "NFMOLE");
        assert_eq!(config.sample.rows, 500);
        assert_eq!(config.sample.mode, SampleMode::Truncate);
        assert!(config.solver.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn target_percentage_range() {
        for bad in [0.0, -0.1, 1.01, f64::NAN] {
            let err = SelectionConfig::new()
                .with_target_percentage(bad)
                .validate()
                .unwrap_err();
            assert_eq!(err.code(), "SELECTION_INVALID_CONFIG");
        }
        assert!(
            SelectionConfig::new()
                .with_target_percentage(1.0)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn negative_weight_is_rejected() {
        let err = SelectionConfig::new()
            .with_objective_weights(1.0, -2.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            SelectionError::InvalidConfig {
                field: "objective_weights.parsimony",
                ..
            }
        ));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: SelectionConfig = serde_json::from_str(
            r#"{
                "target_percentage": 0.5,
                "objective_priorities": {"coverage": 0, "parsimony": 1},
                "sample": {"rows": 20, "mode": {"random": {"seed": 11}}},
                "solver": {"time_limit": 5.0}
            }"#,
        )
        .unwrap();
        assert_eq!(config.target_percentage, 0.5);
        assert_eq!(config.minimum_rows, 1);
        assert_eq!(config.objective_priorities, ObjectivePair::new(0, 1));
        assert_eq!(config.objective_weights, ObjectivePair::new(1.0, 1.0));
        assert_eq!(config.sample.rows, 20);
        assert_eq!(config.sample.columns, 500);
        assert_eq!(config.sample.mode, SampleMode::Random { seed: Some(11) });
        assert_eq!(config.solver.time_limit, Some(5.0));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<SelectionConfig, _> = serde_json::from_str(r#"{"search_path": "x"}"#);
        assert!(result.is_err());
    }
}
