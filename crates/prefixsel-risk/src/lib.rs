//! Risk data preparation for prefix selection.
//!
//! A raw matrix is sampled, thresholded to a binary matrix, weighted per
//! column and finally reduced to one linear coefficient per row: the
//! weighted risk a row contributes while it lies inside each column's
//! prefix set.

pub mod binarizer;
pub mod error;
pub mod matrix;
pub mod prefix;
pub mod sampler;
pub mod weights;

pub use binarizer::{RISK_THRESHOLD, RiskBinarizer};
pub use error::RiskError;
pub use matrix::{BinaryMatrix, RawMatrix, WeightedRiskMatrix};
pub use prefix::{PrefixRisk, PrefixRiskAggregator, PrefixSet};
pub use sampler::{MatrixSampler, SampleConfig, SampleMode};
pub use weights::{REAL_WEIGHT_SCALE, WeightVector};
