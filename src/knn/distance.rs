//! Euclidean distances between query and reference vectors.

use num_traits::{AsPrimitive, Float};
use rayon::prelude::*;

/// Calculates the Euclidean distance between two points directly from their
/// coordinate differences.
///
/// The result is symmetric in its arguments and exactly zero for identical inputs.
pub fn euclidean_distance<F>(a: &[F], b: &[F]) -> f64
where
    F: Float + AsPrimitive<f64>,
{
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = x.as_() - y.as_();
            diff * diff
        })
        .sum::<f64>()
        .sqrt()
}

/// Distance from one query to every reference row, in reference order.
///
/// Each entry uses [`euclidean_distance`], so near-duplicate rows at large
/// magnitudes keep their exact ordering.
pub fn distance_row<F>(query: &[F], reference: &[Vec<F>]) -> Vec<f64>
where
    F: Float + AsPrimitive<f64>,
{
    reference
        .iter()
        .map(|row| euclidean_distance(query, row))
        .collect()
}

/// Pairwise distances between a query set and a reference set.
///
/// Row-major: row `i` holds the distances from query `i` to every reference
/// sample, in reference order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn compute<F>(queries: &[Vec<F>], reference: &[Vec<F>]) -> Self
    where
        F: Float + AsPrimitive<f64>,
    {
        let values = queries
            .iter()
            .flat_map(|q| distance_row(q, reference))
            .collect();
        DistanceMatrix {
            rows: queries.len(),
            cols: reference.len(),
            values,
        }
    }

    /// Same result as [`DistanceMatrix::compute`], with query rows spread over
    /// the rayon thread pool.
    pub fn compute_parallel<F>(queries: &[Vec<F>], reference: &[Vec<F>]) -> Self
    where
        F: Float + AsPrimitive<f64> + Send + Sync,
    {
        let row_values: Vec<Vec<f64>> = queries
            .par_iter()
            .map(|q| distance_row(q, reference))
            .collect();
        DistanceMatrix {
            rows: queries.len(),
            cols: reference.len(),
            values: row_values.into_iter().flatten().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Distances from query `i` to every reference sample.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    pub fn get(&self, query: usize, reference: usize) -> Option<f64> {
        if query < self.rows && reference < self.cols {
            Some(self.values[query * self.cols + reference])
        } else {
            None
        }
    }
}
