//! Python bindings, built with `--features python`.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::error::KnnError;
use crate::knn::{euclidean_distance, KnnClassifier};
use crate::normalization::{self, NormalizationParams};

impl From<KnnError> for PyErr {
    fn from(err: KnnError) -> Self {
        match err {
            KnnError::Io(_) => PyIOError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Calculates the Euclidean distance between two vectors of f64.
#[pyfunction]
fn euclidean_distance_py(a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    if a.len() != b.len() {
        return Err(KnnError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
            context: "distance operands",
        }
        .into());
    }
    Ok(euclidean_distance(&a, &b))
}

/// Fits min-max parameters; returns `(min, range)`.
#[pyfunction]
fn fit_normalizer_py(data: Vec<Vec<f64>>) -> PyResult<(Vec<f64>, Vec<f64>)> {
    let params = normalization::fit(&data)?;
    Ok((params.min, params.range))
}

/// Applies `(vector - min) / range`, mapping zero-range dimensions to 0.
#[pyfunction]
fn normalize_py(vector: Vec<f64>, min: Vec<f64>, range: Vec<f64>) -> PyResult<Vec<f64>> {
    let params = NormalizationParams::new(min, range)?;
    Ok(params.apply(&vector)?)
}

#[pyclass(name = "KnnClassifier")]
struct PyKnnClassifier {
    classifier: KnnClassifier<f64, String>,
}

#[pymethods]
impl PyKnnClassifier {
    #[new]
    #[pyo3(signature = (parallel = false))]
    fn new(parallel: bool) -> Self {
        PyKnnClassifier {
            classifier: KnnClassifier::new().with_parallel(parallel),
        }
    }

    fn train(&mut self, features: Vec<Vec<f64>>, labels: Vec<String>) -> PyResult<()> {
        Ok(self.classifier.train(features, labels)?)
    }

    fn predict(&self, queries: Vec<Vec<f64>>, k: usize) -> PyResult<Vec<String>> {
        Ok(self.classifier.predict(&queries, k)?)
    }

    fn predict_single(&self, query: Vec<f64>, k: usize) -> PyResult<String> {
        Ok(self.classifier.predict_single(&query, k)?)
    }

    fn distance_matrix(&self, queries: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
        let matrix = self.classifier.distance_matrix(&queries)?;
        Ok((0..matrix.rows()).map(|i| matrix.row(i).to_vec()).collect())
    }

    #[getter]
    fn is_trained(&self) -> bool {
        self.classifier.is_trained()
    }
}

#[pymodule]
#[pyo3(name = "nearest_neighbors")]
fn nearest_neighbors_py(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(euclidean_distance_py, m)?)?;
    m.add_function(wrap_pyfunction!(fit_normalizer_py, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_py, m)?)?;
    m.add_class::<PyKnnClassifier>()?;
    Ok(())
}
