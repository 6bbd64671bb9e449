//! Brute-force k-nearest-neighbors classification with min-max feature
//! scaling, a delimited-text dataset loader and hold-out evaluation.

pub mod common_types;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod knn;
pub mod normalization;

#[cfg(feature = "python")]
mod python;

pub use common_types::{DataPoint, ReferenceSet};
pub use dataset::{Dataset, DelimitedFormat, LabelColumn};
pub use error::{KnnError, Result};
pub use evaluation::{classify_normalized, holdout_error_rate, HoldoutConfig, HoldoutReport};
pub use knn::{euclidean_distance, majority_vote, DistanceMatrix, KnnClassifier};
pub use normalization::NormalizationParams;
