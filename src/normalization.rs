//! Min-max feature scaling.
//!
//! Rescales each feature dimension to `[0, 1]` using the minimum and range
//! observed in a reference dataset, so that no dimension dominates the
//! Euclidean distance because of its units.

use tracing::{debug, warn};

use crate::common_types::check_uniform_dimension;
use crate::error::{KnnError, Result};

/// Per-dimension minimum and range (`max - min`) observed by [`fit`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizationParams {
    pub min: Vec<f64>,
    pub range: Vec<f64>,
    degenerate: Vec<usize>,
}

impl NormalizationParams {
    /// Builds parameters from explicit minima and ranges.
    pub fn new(min: Vec<f64>, range: Vec<f64>) -> Result<Self> {
        if min.len() != range.len() {
            return Err(KnnError::DimensionMismatch {
                expected: min.len(),
                found: range.len(),
                context: "normalization range",
            });
        }
        let degenerate = range
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r == 0.0)
            .map(|(dimension, _)| dimension)
            .collect();
        Ok(NormalizationParams {
            min,
            range,
            degenerate,
        })
    }

    pub fn dimension(&self) -> usize {
        self.min.len()
    }

    /// Dimensions whose fitted range was zero. They normalize to 0.
    pub fn degenerate_dimensions(&self) -> &[usize] {
        &self.degenerate
    }

    /// Fails with [`KnnError::DegenerateRange`] naming the first zero-range dimension.
    pub fn ensure_non_degenerate(&self) -> Result<()> {
        match self.degenerate.first() {
            Some(&dimension) => Err(KnnError::DegenerateRange { dimension }),
            None => Ok(()),
        }
    }

    pub fn apply(&self, vector: &[f64]) -> Result<Vec<f64>> {
        apply(vector, &self.min, &self.range)
    }

    pub fn apply_all(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.apply(row)).collect()
    }
}

/// Computes the per-dimension minimum and range of `data`.
///
/// A dimension with zero range is not an error here: it is recorded in
/// [`NormalizationParams::degenerate_dimensions`] and normalizes to 0.
pub fn fit(data: &[Vec<f64>]) -> Result<NormalizationParams> {
    let dimension = check_uniform_dimension(data, "normalization data")?;
    let first = data.first().ok_or(KnnError::EmptyDataset)?;

    let mut min = first.clone();
    let mut max = first.clone();
    for row in &data[1..] {
        for (d, &value) in row.iter().enumerate() {
            min[d] = min[d].min(value);
            max[d] = max[d].max(value);
        }
    }
    let range = max.iter().zip(min.iter()).map(|(hi, lo)| hi - lo).collect();

    let params = NormalizationParams::new(min, range)?;
    for &d in params.degenerate_dimensions() {
        warn!(dimension = d, "feature has zero range; normalizing it to 0");
    }
    debug!(rows = data.len(), dimension, "fitted normalization");
    Ok(params)
}

/// Elementwise `(vector - min) / range`, with zero-range dimensions mapped to 0.
pub fn apply(vector: &[f64], min: &[f64], range: &[f64]) -> Result<Vec<f64>> {
    if vector.len() != min.len() || min.len() != range.len() {
        return Err(KnnError::DimensionMismatch {
            expected: min.len(),
            found: if vector.len() != min.len() { vector.len() } else { range.len() },
            context: "normalization input",
        });
    }
    Ok(vector
        .iter()
        .zip(min.iter().zip(range.iter()))
        .map(|(&value, (&lo, &r))| if r == 0.0 { 0.0 } else { (value - lo) / r })
        .collect())
}

/// Fits on `data` and returns it normalized, together with the parameters
/// needed to normalize later queries the same way.
pub fn fit_transform(data: &[Vec<f64>]) -> Result<(Vec<Vec<f64>>, NormalizationParams)> {
    let params = fit(data)?;
    let normalized = params.apply_all(data)?;
    Ok((normalized, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> Vec<Vec<f64>> {
        vec![
            vec![40920.0, 8.326976, 0.953952],
            vec![14488.0, 7.153469, 1.673904],
            vec![26052.0, 1.441871, 0.805124],
            vec![75136.0, 13.147394, 0.428964],
        ]
    }

    #[test]
    fn test_fit_min_and_range() {
        let params = fit(&sample()).unwrap();
        assert_eq!(params.min, vec![14488.0, 1.441871, 0.428964]);
        assert_abs_diff_eq!(params.range[0], 75136.0 - 14488.0);
        assert!(params.degenerate_dimensions().is_empty());
        assert!(params.ensure_non_degenerate().is_ok());
    }

    #[test]
    fn test_column_extremes_map_to_unit_interval_exactly() {
        let (normalized, _) = fit_transform(&sample()).unwrap();
        // column 0: min in row 1, max in row 3
        assert_eq!(normalized[1][0], 0.0);
        assert_eq!(normalized[3][0], 1.0);
        // column 2: min in row 3, max in row 1
        assert_eq!(normalized[3][2], 0.0);
        assert_eq!(normalized[1][2], 1.0);
        for row in &normalized {
            for &v in row {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_constant_column_normalizes_to_zero() {
        let data = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let (normalized, params) = fit_transform(&data).unwrap();
        assert_eq!(params.degenerate_dimensions(), &[1]);
        for row in &normalized {
            assert_eq!(row[1], 0.0);
        }
        assert_abs_diff_eq!(normalized[1][0], 0.5);
        assert!(matches!(
            params.ensure_non_degenerate(),
            Err(KnnError::DegenerateRange { dimension: 1 })
        ));
    }

    #[test]
    fn test_apply_to_new_query() {
        let params = fit(&sample()).unwrap();
        let query = params.apply(&[14488.0, 13.147394, 0.428964]).unwrap();
        assert_eq!(query, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_apply_outside_fitted_range_is_not_clamped() {
        let out = apply(&[3.0], &[1.0], &[1.0]).unwrap();
        assert_eq!(out, vec![2.0]);
    }

    #[test]
    fn test_apply_dimension_mismatch() {
        let params = fit(&sample()).unwrap();
        assert!(matches!(
            params.apply(&[1.0, 2.0]),
            Err(KnnError::DimensionMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_fit_empty_dataset() {
        assert!(matches!(fit(&[]), Err(KnnError::EmptyDataset)));
    }

    #[test]
    fn test_fit_ragged_rows() {
        let data = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(fit(&data), Err(KnnError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_params_new_mismatch() {
        assert!(NormalizationParams::new(vec![0.0, 1.0], vec![1.0]).is_err());
    }
}
