//! End-to-end selection run.

use crate::builder::{SelectionModel, SelectionModelBuilder};
use crate::config::SelectionConfig;
use crate::error::SelectionError;
use crate::report::{SelectionOutcome, SolutionReporter};
use prefixsel_core::Solver;
use prefixsel_risk::{
    MatrixSampler, PrefixRiskAggregator, RawMatrix, RiskBinarizer, WeightVector,
    WeightedRiskMatrix,
};
use std::time::Instant;
use tracing::debug;

fn timed<T, E>(operation: &'static str, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    let started = Instant::now();
    let result = f();
    let status = if result.is_ok() { "success" } else { "error" };
    debug!(
        component = "pipeline",
        operation,
        status,
        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
        "Stage finished"
    );
    result
}

/// Runs every stage in order; each stage consumes the previous one's output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionPipeline;

impl SelectionPipeline {
    /// Run on text fields as read from delimited files.
    ///
    /// Fields are parsed after sampling, so cells outside the sample are
    /// never inspected.
    ///
    /// # Errors
    ///
    /// Configuration, data and precondition failures are returned before the
    /// solver is called. A non-optimal solve is not an error.
    pub fn run<S, V>(
        raw_rows: &[Vec<S>],
        raw_weights: &[Vec<S>],
        config: &SelectionConfig,
        solver: &mut V,
    ) -> Result<SelectionOutcome, SelectionError>
    where
        S: AsRef<str> + Clone,
        V: Solver + ?Sized,
    {
        config.validate()?;
        SelectionModelBuilder::check_table(raw_rows)?;
        let sampled = timed("sample", || {
            MatrixSampler::new(config.sample).sample(raw_rows)
        })?;
        let raw = timed("parse", || RawMatrix::parse(&sampled))?;
        let weights = WeightVector::parse(raw_weights)?;
        Self::solve_prepared(raw, weights, config, solver)
    }

    /// Run on numeric rows and (possibly nested) numeric weights.
    pub fn run_values<V>(
        raw_rows: &[Vec<f64>],
        raw_weights: &[Vec<f64>],
        config: &SelectionConfig,
        solver: &mut V,
    ) -> Result<SelectionOutcome, SelectionError>
    where
        V: Solver + ?Sized,
    {
        config.validate()?;
        SelectionModelBuilder::check_table(raw_rows)?;
        let sampled = timed("sample", || {
            MatrixSampler::new(config.sample).sample(raw_rows)
        })?;
        let weights = WeightVector::from_nested(raw_weights.to_vec())?;
        Self::solve_prepared(RawMatrix::from_rows(sampled), weights, config, solver)
    }

    /// Binarize, weight, aggregate and build the program from a sampled matrix.
    ///
    /// # Errors
    ///
    /// Fails on data integrity, length mismatch or precondition violations.
    pub fn build(
        raw: &RawMatrix,
        weights: WeightVector,
        config: &SelectionConfig,
    ) -> Result<SelectionModel, SelectionError> {
        SelectionModelBuilder::check_table(raw.rows())?;
        let binary = timed("binarize", || RiskBinarizer::new().binarize(raw))?;
        let weights = timed("align_weights", || weights.align(binary.num_columns()))?;
        let builder = SelectionModelBuilder::new(config);
        builder.check_preconditions(&binary, &weights)?;
        let weighted = timed("weight", || WeightedRiskMatrix::new(&binary, &weights))?;
        let risk = timed("aggregate", || {
            PrefixRiskAggregator::new().aggregate(&binary, &weighted)
        })?;
        timed("build_model", || builder.build(&binary, &weights, &risk))
    }

    fn solve_prepared<V>(
        raw: RawMatrix,
        weights: WeightVector,
        config: &SelectionConfig,
        solver: &mut V,
    ) -> Result<SelectionOutcome, SelectionError>
    where
        V: Solver + ?Sized,
    {
        let built = Self::build(&raw, weights, config)?;
        let started = Instant::now();
        let result = solver.solve(built.model());
        let status = if result.is_ok() { "success" } else { "error" };
        debug!(
            component = "pipeline",
            operation = "solve",
            status,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Stage finished"
        );
        SolutionReporter::new().report(&built, result)
    }
}
