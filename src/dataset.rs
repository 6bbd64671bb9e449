//! Loading numeric datasets from delimited text.
//!
//! Two layouts are supported out of the box: the tab-separated dating data
//! (feature columns followed by an integer class) and the comma-separated
//! digit data (header row, class in the first column, pixel columns after it).

use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::common_types::DataPoint;
use crate::error::{KnnError, Result};

/// Which column of a row holds the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelColumn {
    First,
    Last,
}

/// Layout of a delimited text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedFormat {
    pub delimiter: u8,
    pub label_column: Option<LabelColumn>,
    pub has_header: bool,
}

impl DelimitedFormat {
    /// Tab-separated, label last, no header.
    pub fn dating() -> Self {
        DelimitedFormat {
            delimiter: b'\t',
            label_column: Some(LabelColumn::Last),
            has_header: false,
        }
    }

    /// Comma-separated, label first, one header row.
    pub fn digits() -> Self {
        DelimitedFormat {
            delimiter: b',',
            label_column: Some(LabelColumn::First),
            has_header: true,
        }
    }

    /// Comma-separated query rows with a header and no label column.
    pub fn digits_unlabeled() -> Self {
        DelimitedFormat {
            delimiter: b',',
            label_column: None,
            has_header: true,
        }
    }
}

/// Parsed feature rows and their labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<L> {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<L>,
}

impl<L> Dataset<L> {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.features.first().map_or(0, |row| row.len())
    }

    pub fn into_points(self) -> Vec<DataPoint<f64, L>> {
        self.features
            .into_iter()
            .zip(self.labels)
            .map(|(features, label)| DataPoint::new(features, label))
            .collect()
    }
}

/// Parses labeled rows from `reader`.
///
/// Blank lines are skipped. Every row must have the same number of feature
/// columns as the first; violations are reported with their 1-based line number.
pub fn parse_labeled<L, R>(reader: R, format: DelimitedFormat) -> Result<Dataset<L>>
where
    L: FromStr,
    L::Err: Display,
    R: Read,
{
    let label_column = format.label_column.ok_or_else(|| KnnError::InvalidParameter {
        name: "label_column".to_string(),
        reason: "labeled parsing needs a label column".to_string(),
    })?;

    let mut features = Vec::new();
    let mut labels = Vec::new();
    for_each_record(reader, format, |line, record| {
        let label_index = match label_column {
            LabelColumn::First => 0,
            LabelColumn::Last => record.len().saturating_sub(1),
        };
        let label_field = record.get(label_index).ok_or_else(|| KnnError::Parse {
            line,
            message: "missing label column".to_string(),
        })?;
        let label = label_field.parse::<L>().map_err(|e| KnnError::Parse {
            line,
            message: format!("invalid label {label_field:?}: {e}"),
        })?;
        let fields = record
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != label_index)
            .map(|(_, field)| field);
        let row = parse_features(line, fields)?;
        check_row_width(line, &features, &row)?;
        features.push(row);
        labels.push(label);
        Ok(())
    })?;

    debug!(rows = features.len(), "parsed labeled dataset");
    Ok(Dataset { features, labels })
}

/// Parses unlabeled query rows from `reader`. Any label column in `format` is ignored.
pub fn parse_unlabeled<R: Read>(reader: R, format: DelimitedFormat) -> Result<Vec<Vec<f64>>> {
    let mut features = Vec::new();
    for_each_record(reader, format, |line, record| {
        let row = parse_features(line, record.iter())?;
        check_row_width(line, &features, &row)?;
        features.push(row);
        Ok(())
    })?;
    debug!(rows = features.len(), "parsed unlabeled dataset");
    Ok(features)
}

pub fn load_labeled<L>(path: impl AsRef<Path>, format: DelimitedFormat) -> Result<Dataset<L>>
where
    L: FromStr,
    L::Err: Display,
{
    let file = File::open(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "loading labeled dataset");
    parse_labeled(BufReader::new(file), format)
}

pub fn load_unlabeled(path: impl AsRef<Path>, format: DelimitedFormat) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "loading unlabeled dataset");
    parse_unlabeled(BufReader::new(file), format)
}

fn for_each_record<R, G>(reader: R, format: DelimitedFormat, mut handle: G) -> Result<()>
where
    R: Read,
    G: FnMut(usize, &StringRecord) -> Result<()>,
{
    // Flexible so that ragged rows reach check_row_width with their line number.
    let mut reader = ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(format.has_header)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line() as usize);
        handle(line, &record)?;
    }
    Ok(())
}

fn parse_features<'a>(line: usize, fields: impl Iterator<Item = &'a str>) -> Result<Vec<f64>> {
    fields
        .map(|field| {
            field.parse::<f64>().map_err(|e| KnnError::Parse {
                line,
                message: format!("invalid number {field:?}: {e}"),
            })
        })
        .collect()
}

fn check_row_width(line: usize, rows: &[Vec<f64>], row: &[f64]) -> Result<()> {
    match rows.first() {
        Some(first) if first.len() != row.len() => Err(KnnError::Parse {
            line,
            message: format!("expected {} feature columns, found {}", first.len(), row.len()),
        }),
        _ => Ok(()),
    }
}
