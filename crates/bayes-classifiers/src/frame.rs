//! Columnar integer table shared by every stage of the pipeline.
//!
//! A `Frame` maps column names to equally long integer vectors. It is built
//! once from ingested data and never mutated afterwards; splitting and row
//! selection produce new frames.
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{ClassifierError, Result};

/// Feature values for a single row, keyed by column name.
pub type Sample = BTreeMap<String, i64>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    columns: BTreeMap<String, Vec<i64>>,
    n_rows: usize,
}

/// Per-column overview used by `describe`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    /// `None` for an empty column.
    pub mean: Option<f64>,
    pub unique: usize,
    /// Most frequent value; ties resolve to the smallest value.
    pub mode: Option<i64>,
}

impl Frame {
    /// Build a frame, failing if the columns do not all have the same length.
    pub fn new(columns: BTreeMap<String, Vec<i64>>) -> Result<Self> {
        let mut expected: Option<usize> = None;
        for (name, values) in &columns {
            match expected {
                None => expected = Some(values.len()),
                Some(n) if n != values.len() => {
                    return Err(ClassifierError::ColumnLengthMismatch {
                        column: name.clone(),
                        expected: n,
                        actual: values.len(),
                    })
                }
                Some(_) => {}
            }
        }

        Ok(Frame {
            columns,
            n_rows: expected.unwrap_or(0),
        })
    }

    /// Convenience constructor from `(name, values)` pairs.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<i64>)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (name, values) in columns {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(ClassifierError::InvalidParameter {
                    name: "column".to_string(),
                    value: name,
                    reason: "duplicate column name".to_string(),
                });
            }
            map.insert(name, values);
        }
        Frame::new(map)
    }

    pub fn nrows(&self) -> usize {
        self.n_rows
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column(&self, name: &str) -> Option<&[i64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn require_column(&self, name: &str) -> Result<&[i64]> {
        self.column(name)
            .ok_or_else(|| ClassifierError::MissingColumn(name.to_string()))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every column except `label`, in name order.
    pub fn feature_names(&self, label: &str) -> Vec<&str> {
        self.column_names().filter(|name| *name != label).collect()
    }

    /// Returns the label column after checking it only holds 0 and 1.
    pub fn binary_labels(&self, label: &str) -> Result<&[i64]> {
        let labels = self.require_column(label)?;
        if let Some((row, &value)) = labels
            .iter()
            .enumerate()
            .find(|(_, &v)| v != 0 && v != 1)
        {
            return Err(ClassifierError::NonBinaryLabel {
                column: label.to_string(),
                row,
                value,
            });
        }
        Ok(labels)
    }

    /// Feature vector of row `idx`, leaving out the `exclude` column.
    ///
    /// Panics if `idx` is out of bounds.
    pub fn row(&self, idx: usize, exclude: &str) -> Sample {
        self.columns
            .iter()
            .filter(|(name, _)| name.as_str() != exclude)
            .map(|(name, values)| (name.clone(), values[idx]))
            .collect()
    }

    /// Gather the given rows, in the given order, from every column.
    ///
    /// Panics if an index is out of bounds.
    pub fn select_rows(&self, indices: &[usize]) -> Frame {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                let selected = indices.iter().map(|&i| values[i]).collect::<Vec<_>>();
                (name.clone(), selected)
            })
            .collect();

        Frame {
            columns,
            n_rows: indices.len(),
        }
    }

    /// The first `n` rows (5 when `n` is 0).
    pub fn head(&self, n: usize) -> Frame {
        let n = if n == 0 { 5 } else { n };
        let n = n.min(self.n_rows);
        self.select_rows(&(0..n).collect::<Vec<_>>())
    }

    pub fn describe(&self) -> Vec<ColumnSummary> {
        self.columns
            .iter()
            .map(|(name, values)| summarize_column(name, values))
            .collect()
    }
}

fn summarize_column(name: &str, values: &[i64]) -> ColumnSummary {
    let mean = if values.is_empty() {
        None
    } else {
        Some(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
    };

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for &v in values {
        *counts.entry(v).or_default() += 1;
    }

    let mode = counts
        .iter()
        .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.cmp(va)))
        .map(|(&v, _)| v);

    ColumnSummary {
        name: name.to_string(),
        mean,
        unique: counts.len(),
        mode,
    }
}
