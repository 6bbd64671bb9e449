//! Data structures shared by the classifier, the normalizer and the loader.

use crate::error::{KnnError, Result};

/// Represents a single labeled sample, with features and a label.
///
/// - `F`: The type of the features (e.g., `f64`, `f32`).
/// - `L`: The type of the label (e.g., `i32`, `String`, an enum).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataPoint<F, L> {
    pub features: Vec<F>,
    pub label: L,
}

impl<F, L> DataPoint<F, L> {
    pub fn new(features: Vec<F>, label: L) -> Self {
        DataPoint { features, label }
    }
}

/// The stored training data of a classifier: feature rows, their labels and
/// the shared dimensionality.
#[derive(Debug, Clone)]
pub struct ReferenceSet<F, L> {
    features: Vec<Vec<F>>,
    labels: Vec<L>,
    dimension: usize,
}

impl<F, L> ReferenceSet<F, L> {
    /// Builds a reference set, rejecting length or dimensionality mismatches.
    pub fn new(features: Vec<Vec<F>>, labels: Vec<L>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(KnnError::DimensionMismatch {
                expected: features.len(),
                found: labels.len(),
                context: "reference labels",
            });
        }
        let dimension = check_uniform_dimension(&features, "reference features")?;
        Ok(ReferenceSet {
            features,
            labels,
            dimension,
        })
    }

    pub fn from_points(points: Vec<DataPoint<F, L>>) -> Result<Self> {
        let (features, labels) = points.into_iter().map(|p| (p.features, p.label)).unzip();
        Self::new(features, labels)
    }

    pub fn features(&self) -> &[Vec<F>] {
        &self.features
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Returns the common row length of `rows`, or 0 for no rows.
pub(crate) fn check_uniform_dimension<F>(rows: &[Vec<F>], context: &'static str) -> Result<usize> {
    let dimension = rows.first().map_or(0, |row| row.len());
    match rows.iter().find(|row| row.len() != dimension) {
        Some(row) => Err(KnnError::DimensionMismatch {
            expected: dimension,
            found: row.len(),
            context,
        }),
        None => Ok(dimension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_set_from_points() {
        let points = vec![
            DataPoint::new(vec![1.0, 2.0], "A"),
            DataPoint::new(vec![3.0, 4.0], "B"),
        ];
        let set = ReferenceSet::from_points(points).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.dimension(), 2);
        assert_eq!(set.labels(), &["A", "B"]);
    }

    #[test]
    fn test_reference_set_rejects_ragged_rows() {
        let result = ReferenceSet::new(vec![vec![1.0, 2.0], vec![3.0]], vec![0, 1]);
        assert!(matches!(
            result,
            Err(KnnError::DimensionMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_reference_set_rejects_label_count_mismatch() {
        let result = ReferenceSet::new(vec![vec![1.0], vec![2.0], vec![3.0]], vec![0, 1]);
        assert!(matches!(
            result,
            Err(KnnError::DimensionMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_empty_reference_set() {
        let set: ReferenceSet<f64, i32> = ReferenceSet::new(vec![], vec![]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.dimension(), 0);
    }
}
