//! Selection of the shortest row prefix of a risk matrix that reaches a
//! coverage target.
//!
//! [`SelectionPipeline`] runs the whole flow: sampling, binarization,
//! weighting, prefix aggregation, model building with
//! [`SelectionModelBuilder`], solving through any [`prefixsel_core::Solver`],
//! and reporting with [`SolutionReporter`].

pub mod builder;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use builder::{
    COVERAGE_OBJECTIVE, MIN_ROWS_CONSTRAINT, MONOTONIC_CONSTRAINT, NamedConstraint,
    PARSIMONY_OBJECTIVE, SELECTION_VARIABLE, SelectionModel, SelectionModelBuilder,
    TARGET_CONSTRAINT, parsimony_weight,
};
pub use config::{ObjectivePair, SelectionConfig};
pub use error::SelectionError;
pub use pipeline::SelectionPipeline;
pub use report::{
    ConstraintSlack, ObjectiveValues, SelectionOutcome, SelectionStatus, SolutionReporter,
};
