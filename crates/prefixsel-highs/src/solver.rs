//! HiGHS solver implementation.

use crate::ffi::{HighsStatus, ObjectiveSense, TierProblem, TierProblemError};
use prefixsel_core::{Model, ObjectiveTier, Sense, Solution, Solver, SolverError};
use prefixsel_expr::VariableId;
use prefixsel_solver::{SolverConfig, SolverStatus};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, trace, warn};

fn tier_problem_error(err: TierProblemError) -> SolverError {
    SolverError::SolverSpecific(err.to_string())
}

/// Row held fixed after its objective tier has been optimized.
#[derive(Debug, Clone)]
struct TierHold {
    terms: Vec<(usize, f64)>,
    lower: f64,
    upper: f64,
}

/// HiGHS-backed implementation of [`Solver`].
///
/// Each objective tier is solved as its own HiGHS problem. Once a tier is
/// optimal its value is added as a hold row, relaxed by
/// [`SolverConfig::hold_tolerance`], before the next tier is optimized.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: SolverConfig,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver for HighsSolver {
    fn solve(&mut self, model: &Model) -> Result<Solution, SolverError> {
        solve_model(model, &self.config)
    }
}

fn validate_model(model: &Model) -> Result<(), SolverError> {
    if model.num_variables() == 0 {
        return Err(SolverError::EmptyModel);
    }
    if model.objectives().is_empty() {
        return Err(SolverError::NoObjective);
    }
    Ok(())
}

fn apply_solver_config(problem: &mut TierProblem, config: &SolverConfig) {
    problem.set_console_log(config.log_to_console.unwrap_or(false));

    if let Some(limit) = config.time_limit {
        problem.set_option("time_limit", limit);
    }
    if let Some(gap) = config.mip_gap {
        problem.set_option("mip_rel_gap", gap);
    }
    if let Some(presolve) = config.presolve {
        problem.set_option("presolve", if presolve { "on" } else { "off" });
    }
    if let Some(threads) = config.threads {
        problem.set_option("threads", i32::try_from(threads).unwrap_or(i32::MAX));
    }
}

fn tier_coefficients(model: &Model, tier: &ObjectiveTier) -> Result<Vec<f64>, SolverError> {
    let mut coeffs = vec![0.0; model.num_variables()];
    for (var_id, coeff) in &tier.terms {
        let slot = coeffs
            .get_mut(var_id.index())
            .ok_or(SolverError::InvalidVariableId(var_id.inner()))?;
        *slot += *coeff;
    }
    Ok(coeffs)
}

fn add_variables_to_highs(model: &Model, problem: &mut TierProblem, objective: &[f64]) {
    for (var_id, var) in model.variables() {
        let cost = objective.get(var_id.index()).copied().unwrap_or(0.0);
        problem.add_column(var.bounds.lower, var.bounds.upper, cost, var.is_integer);
    }
}

fn add_constraints_to_highs(
    model: &Model,
    problem: &mut TierProblem,
    rows: &[Vec<(VariableId, f64)>],
) -> Result<(), SolverError> {
    for ((constraint_id, constraint), row) in model.constraints().zip(rows) {
        let terms: Vec<(usize, f64)> = row
            .iter()
            .map(|(var_id, coeff)| (var_id.index(), *coeff))
            .collect();
        problem
            .add_row(constraint.bounds.lower, constraint.bounds.upper, &terms)
            .map_err(tier_problem_error)?;
        trace!(
            component = "solver",
            operation = "add_constraint",
            status = "success",
            constraint_id = constraint_id.inner(),
            terms = terms.len(),
            "Added constraint to HiGHS"
        );
    }
    Ok(())
}

/// Hold row keeping `tier` within tolerance of its optimum `value`.
fn hold_row(tier: &ObjectiveTier, value: f64, sense: Sense, config: &SolverConfig) -> TierHold {
    let tolerance = config.hold_tolerance(value);
    let target = value - tier.constant;
    let (lower, upper) = match sense {
        Sense::Maximize => (target - tolerance, f64::INFINITY),
        Sense::Minimize => (f64::NEG_INFINITY, target + tolerance),
    };
    let terms = tier
        .terms
        .iter()
        .map(|(var_id, coeff)| (var_id.index(), *coeff))
        .collect();
    TierHold {
        terms,
        lower,
        upper,
    }
}

fn solve_tier(
    model: &Model,
    config: &SolverConfig,
    tier: &ObjectiveTier,
    rows: &[Vec<(VariableId, f64)>],
    holds: &[TierHold],
) -> Result<(HighsStatus, Vec<f64>), SolverError> {
    let mut problem = TierProblem::new(match model.sense() {
        Sense::Minimize => ObjectiveSense::Minimize,
        Sense::Maximize => ObjectiveSense::Maximize,
    });
    apply_solver_config(&mut problem, config);

    let objective = tier_coefficients(model, tier)?;
    add_variables_to_highs(model, &mut problem, &objective);
    add_constraints_to_highs(model, &mut problem, rows)?;
    for hold in holds {
        problem
            .add_row(hold.lower, hold.upper, &hold.terms)
            .map_err(tier_problem_error)?;
    }

    let status = problem.solve();
    if status != HighsStatus::Optimal {
        return Ok((status, Vec::new()));
    }
    let values = problem.column_values().map_err(tier_problem_error)?;
    Ok((status, values))
}

/// Solve every objective tier of `model` in ascending priority order.
fn solve_model(model: &Model, config: &SolverConfig) -> Result<Solution, SolverError> {
    validate_model(model)?;

    let solve_started = Instant::now();
    let tiers = model.objective_tiers();
    let rows = model.rows();

    debug!(
        component = "solver",
        operation = "solve",
        status = "start",
        solver = "highs",
        variables = model.num_variables() as u64,
        constraints = model.num_constraints() as u64,
        nnz = model.num_coefficients() as u64,
        tiers = tiers.len() as u64,
        sense = model.sense().as_str(),
        "Starting solve process"
    );

    let mut holds: Vec<TierHold> = Vec::with_capacity(tiers.len().saturating_sub(1));
    let mut metadata = BTreeMap::new();
    let mut primal = Vec::new();

    for (position, tier) in tiers.iter().enumerate() {
        let tier_started = Instant::now();
        let (status, values) = solve_tier(model, config, tier, &rows, &holds)?;
        let duration_ms = tier_started.elapsed().as_secs_f64() * 1000.0;

        if status != HighsStatus::Optimal {
            warn!(
                component = "solver",
                operation = "solve_tier",
                status = "error",
                priority = tier.priority,
                highs_status = status.as_str(),
                duration_ms,
                "Objective tier did not reach optimality"
            );
            return Err(SolverError::SolveFailure {
                status: status.into(),
            });
        }

        let value = tier.evaluate(&values);
        debug!(
            component = "solver",
            operation = "solve_tier",
            status = "success",
            priority = tier.priority,
            members = tier.members.len() as u64,
            objective_value = value,
            duration_ms,
            "Solved objective tier"
        );
        metadata.insert(format!("tier_{}_value", tier.priority), value);

        if position + 1 < tiers.len() {
            holds.push(hold_row(tier, value, model.sense(), config));
        }
        primal = values;
    }

    let mut solution = Solution::from_primal(model, primal, SolverStatus::Optimal);
    solution.solve_time_seconds = solve_started.elapsed().as_secs_f64();
    metadata.insert("tiers".to_string(), tiers.len() as f64);
    solution.metadata = metadata;

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solve_time_seconds = solution.solve_time_seconds,
        "Solve complete"
    );

    Ok(solution)
}
