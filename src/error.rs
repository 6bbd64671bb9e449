//! Error types shared by the classifier, the normalizer and the dataset loader.

use thiserror::Error;

/// Errors raised by nearest-neighbor classification and its preprocessing.
#[derive(Debug, Error)]
pub enum KnnError {
    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        context: &'static str,
    },

    #[error("Classifier not trained: call train() before predict()")]
    NotTrained,

    #[error("Invalid k: {k} (must be in 1..={reference_size})")]
    InvalidK { k: usize, reference_size: usize },

    #[error("Degenerate range: feature dimension {dimension} has zero range")]
    DegenerateRange { dimension: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Result type for nearest-neighbor operations.
pub type Result<T> = std::result::Result<T, KnnError>;

impl From<csv::Error> for KnnError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |p| p.line() as usize);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => KnnError::Io(io),
            _ => KnnError::Parse { line, message },
        }
    }
}
