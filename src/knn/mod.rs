//! Brute-force k-nearest-neighbors classification.

pub mod distance;
pub mod vote;

use num_traits::{AsPrimitive, Float};
use rayon::prelude::*;
use tracing::debug;

use crate::common_types::{DataPoint, ReferenceSet};
use crate::error::{KnnError, Result};

pub use distance::{euclidean_distance, DistanceMatrix};
pub use vote::{majority_vote, nearest_indices};

/// The K-Nearest Neighbors Classifier.
///
/// Training only stores the reference set. Every call to [`KnnClassifier::predict`]
/// computes a fresh distance matrix against it and polls the `k` nearest labels.
#[derive(Debug, Clone)]
pub struct KnnClassifier<F, L> {
    reference: Option<ReferenceSet<F, L>>,
    parallel: bool,
}

impl<F, L> Default for KnnClassifier<F, L> {
    fn default() -> Self {
        Self {
            reference: None,
            parallel: false,
        }
    }
}

impl<F, L> KnnClassifier<F, L>
where
    F: Float + AsPrimitive<f64> + Send + Sync,
    L: Ord + Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Spread query rows over the rayon thread pool during prediction.
    /// Results are identical to the sequential path.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Stores `features` and `labels` as the reference set, replacing any previous one.
    ///
    /// Fails with [`KnnError::DimensionMismatch`] if the lengths differ or the
    /// feature vectors are ragged; the previous reference set is kept in that case.
    /// Training on no samples leaves the classifier untrained.
    pub fn train(&mut self, features: Vec<Vec<F>>, labels: Vec<L>) -> Result<()> {
        let reference = ReferenceSet::new(features, labels)?;
        if reference.is_empty() {
            debug!("trained on an empty reference set; classifier is untrained");
            self.reference = None;
            return Ok(());
        }
        debug!(
            samples = reference.len(),
            dimension = reference.dimension(),
            "stored reference set"
        );
        self.reference = Some(reference);
        Ok(())
    }

    pub fn train_points(&mut self, points: Vec<DataPoint<F, L>>) -> Result<()> {
        let (features, labels) = points.into_iter().map(|p| (p.features, p.label)).unzip();
        self.train(features, labels)
    }

    pub fn is_trained(&self) -> bool {
        self.reference.is_some()
    }

    pub fn reference(&self) -> Option<&ReferenceSet<F, L>> {
        self.reference.as_ref()
    }

    /// Predicts one label per query, in query order.
    ///
    /// # Errors
    /// - [`KnnError::NotTrained`] if no reference set is stored.
    /// - [`KnnError::InvalidK`] if `k` is 0 or exceeds the reference size.
    /// - [`KnnError::DimensionMismatch`] if a query's length differs from the reference dimensionality.
    pub fn predict(&self, queries: &[Vec<F>], k: usize) -> Result<Vec<L>> {
        let reference = self.ready_reference(k)?;
        check_query_dimensions(reference, queries)?;
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            queries = queries.len(),
            reference = reference.len(),
            k,
            parallel = self.parallel,
            "predicting"
        );

        if self.parallel {
            let matrix = DistanceMatrix::compute_parallel(queries, reference.features());
            (0..matrix.rows())
                .into_par_iter()
                .map(|i| vote_row(reference, matrix.row(i), k))
                .collect()
        } else {
            let matrix = DistanceMatrix::compute(queries, reference.features());
            (0..matrix.rows())
                .map(|i| vote_row(reference, matrix.row(i), k))
                .collect()
        }
    }

    /// Predicts the label of a single query.
    pub fn predict_single(&self, query: &[F], k: usize) -> Result<L> {
        let reference = self.ready_reference(k)?;
        if query.len() != reference.dimension() {
            return Err(KnnError::DimensionMismatch {
                expected: reference.dimension(),
                found: query.len(),
                context: "query features",
            });
        }
        let matrix = DistanceMatrix::compute(&[query.to_vec()], reference.features());
        vote_row(reference, matrix.row(0), k)
    }

    /// Distances from every query to every reference sample, for diagnostics.
    pub fn distance_matrix(&self, queries: &[Vec<F>]) -> Result<DistanceMatrix> {
        let reference = self.reference.as_ref().ok_or(KnnError::NotTrained)?;
        check_query_dimensions(reference, queries)?;
        Ok(if self.parallel {
            DistanceMatrix::compute_parallel(queries, reference.features())
        } else {
            DistanceMatrix::compute(queries, reference.features())
        })
    }

    fn ready_reference(&self, k: usize) -> Result<&ReferenceSet<F, L>> {
        let reference = self.reference.as_ref().ok_or(KnnError::NotTrained)?;
        if k == 0 || k > reference.len() {
            return Err(KnnError::InvalidK {
                k,
                reference_size: reference.len(),
            });
        }
        Ok(reference)
    }
}

fn check_query_dimensions<F, L>(reference: &ReferenceSet<F, L>, queries: &[Vec<F>]) -> Result<()> {
    match queries.iter().find(|q| q.len() != reference.dimension()) {
        Some(query) => Err(KnnError::DimensionMismatch {
            expected: reference.dimension(),
            found: query.len(),
            context: "query features",
        }),
        None => Ok(()),
    }
}

fn vote_row<F, L: Ord + Clone>(reference: &ReferenceSet<F, L>, distances: &[f64], k: usize) -> Result<L> {
    let labels = reference.labels();
    majority_vote(nearest_indices(distances, k).into_iter().map(|i| &labels[i])).ok_or(
        KnnError::InvalidK {
            k,
            reference_size: reference.len(),
        },
    )
}
