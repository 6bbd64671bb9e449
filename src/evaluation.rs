//! Hold-out evaluation of the classifier on a labeled dataset.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::dataset::Dataset;
use crate::error::{KnnError, Result};
use crate::knn::KnnClassifier;
use crate::normalization;

/// Settings for [`holdout_error_rate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoldoutConfig {
    /// Number of neighbors polled per query.
    pub k: usize,
    /// Fraction of rows held out as queries, in `(0, 1)`.
    pub test_ratio: f64,
    /// Min-max normalize all rows before splitting.
    pub normalize: bool,
    /// Shuffle rows with this seed before splitting. `None` holds out the leading rows.
    pub shuffle_seed: Option<u64>,
    /// Classify held-out rows on the rayon thread pool. Predictions are unchanged.
    pub parallel: bool,
}

impl Default for HoldoutConfig {
    fn default() -> Self {
        Self {
            k: 3,
            test_ratio: 0.10,
            normalize: true,
            shuffle_seed: None,
            parallel: false,
        }
    }
}

/// Outcome of a hold-out run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoldoutReport<L> {
    pub tested: usize,
    pub error_count: usize,
    pub error_rate: f64,
    /// Predicted labels of the held-out rows, in split order.
    pub predictions: Vec<L>,
}

/// Trains on all but the held-out fraction of `dataset` and reports how many
/// held-out rows are misclassified.
pub fn holdout_error_rate<L>(dataset: &Dataset<L>, config: &HoldoutConfig) -> Result<HoldoutReport<L>>
where
    L: Ord + Clone + Send + Sync,
{
    if !(config.test_ratio > 0.0 && config.test_ratio < 1.0) {
        return Err(KnnError::InvalidParameter {
            name: "test_ratio".to_string(),
            reason: format!("must be in (0, 1), got {}", config.test_ratio),
        });
    }
    if dataset.is_empty() {
        return Err(KnnError::EmptyDataset);
    }
    if dataset.features.len() != dataset.labels.len() {
        return Err(KnnError::DimensionMismatch {
            expected: dataset.features.len(),
            found: dataset.labels.len(),
            context: "dataset labels",
        });
    }

    let rows = if config.normalize {
        normalization::fit_transform(&dataset.features)?.0
    } else {
        dataset.features.clone()
    };

    let total = rows.len();
    let num_test = (total as f64 * config.test_ratio) as usize;
    if num_test == 0 || num_test == total {
        return Err(KnnError::InvalidParameter {
            name: "test_ratio".to_string(),
            reason: format!("{} of {total} rows leaves an empty split", config.test_ratio),
        });
    }

    let mut order: Vec<usize> = (0..total).collect();
    if let Some(seed) = config.shuffle_seed {
        order.shuffle(&mut StdRng::seed_from_u64(seed));
    }
    let (test_idx, reference_idx) = order.split_at(num_test);

    let mut classifier = KnnClassifier::new().with_parallel(config.parallel);
    classifier.train(
        reference_idx.iter().map(|&i| rows[i].clone()).collect(),
        reference_idx.iter().map(|&i| dataset.labels[i].clone()).collect(),
    )?;
    let queries: Vec<Vec<f64>> = test_idx.iter().map(|&i| rows[i].clone()).collect();
    let predictions = classifier.predict(&queries, config.k)?;

    let error_count = predictions
        .iter()
        .zip(test_idx.iter())
        .filter(|&(predicted, &i)| *predicted != dataset.labels[i])
        .count();
    let error_rate = error_count as f64 / num_test as f64;
    info!(
        tested = num_test,
        error_count,
        error_rate,
        k = config.k,
        "hold-out evaluation finished"
    );

    Ok(HoldoutReport {
        tested: num_test,
        error_count,
        error_rate,
        predictions,
    })
}

/// Classifies a raw, unnormalized query against `dataset` after scaling both
/// with the dataset's min-max parameters.
pub fn classify_normalized<L>(dataset: &Dataset<L>, raw_query: &[f64], k: usize) -> Result<L>
where
    L: Ord + Clone + Send + Sync,
{
    let (rows, params) = normalization::fit_transform(&dataset.features)?;
    let query = params.apply(raw_query)?;
    let mut classifier = KnnClassifier::new();
    classifier.train(rows, dataset.labels.clone())?;
    classifier.predict_single(&query, k)
}
