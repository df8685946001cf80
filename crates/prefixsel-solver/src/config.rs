//! Backend options shared by every solver.

use serde::Deserialize;

/// Floor for the slack allowed when a solved tier is held for later tiers.
pub const DEFAULT_OBJECTIVE_TOLERANCE: f64 = 1e-6;

/// Options passed through to the backend. `None` keeps the backend's own
/// default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Seconds, applied to each objective tier separately.
    pub time_limit: Option<f64>,
    /// Relative MIP gap.
    pub mip_gap: Option<f64>,
    pub presolve: Option<bool>,
    pub threads: Option<u32>,
    /// Let the backend print its own progress log.
    pub log_to_console: Option<bool>,
    /// Relative slack for held tiers; see [`SolverConfig::hold_tolerance`].
    pub objective_tolerance: Option<f64>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    pub fn with_objective_tolerance(mut self, tolerance: f64) -> Self {
        self.objective_tolerance = Some(tolerance);
        self
    }

    /// How far a later tier may push an earlier tier's optimum `value`:
    /// `tol * max(1, |value|)`.
    pub fn hold_tolerance(&self, value: f64) -> f64 {
        let tol = self
            .objective_tolerance
            .unwrap_or(DEFAULT_OBJECTIVE_TOLERANCE);
        tol * value.abs().max(1.0)
    }

    /// True when no option overrides a backend default.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
