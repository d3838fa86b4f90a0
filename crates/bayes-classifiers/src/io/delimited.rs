//! Delimited text (CSV/TSV) reader producing integer frames.
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::frame::Frame;
use crate::models::Prediction;
use crate::preprocessing::{BinaryLabeller, FieldEncoder};

/// Configuration for reading delimited dataset files.
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Field delimiter. When `None`, `.tsv` files use a tab and everything
    /// else a comma.
    pub delimiter: Option<u8>,
}

impl ReaderConfig {
    fn delimiter_for(&self, path: &Path) -> u8 {
        self.delimiter.unwrap_or_else(|| {
            let is_tsv = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("tsv"))
                .unwrap_or(false);
            if is_tsv {
                b'\t'
            } else {
                b','
            }
        })
    }
}

/// Read a delimited file with a header row using the default labeller.
pub fn read_frame<P: AsRef<Path>>(path: P) -> Result<Frame> {
    read_frame_with_config(path, &ReaderConfig::default(), &BinaryLabeller::default())
}

/// Read a delimited file with a header row, encoding every field with `encoder`.
pub fn read_frame_with_config<P: AsRef<Path>>(
    path: P,
    config: &ReaderConfig,
    encoder: &dyn FieldEncoder,
) -> Result<Frame> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter_for(path))
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse record {}", i + 1))?;
        rows.push(record.iter().map(|f| f.to_string()).collect::<Vec<_>>());
    }

    let frame = frame_from_records(&headers, &rows, encoder)
        .with_context(|| format!("Invalid dataset: {}", path.display()))?;

    log::info!(
        "Loaded {} rows x {} columns from {} (encoder: {})",
        frame.nrows(),
        frame.ncols(),
        path.display(),
        encoder.name()
    );
    Ok(frame)
}

/// Encode raw text rows into a column-keyed frame.
pub fn frame_from_records<S: AsRef<str>>(
    headers: &[S],
    rows: &[Vec<String>],
    encoder: &dyn FieldEncoder,
) -> Result<Frame> {
    if headers.is_empty() || headers.iter().all(|h| h.as_ref().is_empty()) {
        anyhow::bail!("Dataset has no header row");
    }

    let mut seen = HashSet::new();
    for header in headers {
        if !seen.insert(header.as_ref()) {
            anyhow::bail!("Duplicate column name in header: {}", header.as_ref());
        }
    }

    let mut columns: Vec<Vec<i64>> = vec![Vec::with_capacity(rows.len()); headers.len()];
    for (i, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            anyhow::bail!(
                "Row {} has {} fields, expected {}",
                i + 1,
                row.len(),
                headers.len()
            );
        }
        for (column, field) in columns.iter_mut().zip(row) {
            column.push(encoder.encode(field));
        }
    }

    let map: BTreeMap<String, Vec<i64>> = headers
        .iter()
        .map(|h| h.as_ref().to_string())
        .zip(columns)
        .collect();

    Ok(Frame::new(map)?)
}

/// Write `frame` followed by a `prediction` column as CSV.
///
/// Rows without a confident class are written as `NA`.
pub fn write_predictions<W: Write>(
    writer: W,
    frame: &Frame,
    predictions: &[Prediction],
) -> Result<()> {
    if predictions.len() != frame.nrows() {
        anyhow::bail!(
            "Got {} predictions for {} rows",
            predictions.len(),
            frame.nrows()
        );
    }

    let mut wtr = csv::Writer::from_writer(writer);
    let names: Vec<&str> = frame.column_names().collect();
    let mut header = names.clone();
    header.push("prediction");
    wtr.write_record(&header)?;

    let columns: Vec<&[i64]> = frame.columns().map(|(_, values)| values).collect();
    for (row, prediction) in predictions.iter().enumerate() {
        let mut record: Vec<String> = columns.iter().map(|c| c[row].to_string()).collect();
        record.push(prediction.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
