//! Flat tabular persistence for the reading table.
//!
//! Layout: a `timestamp` column first, then one column per sensor that
//! was active at save time, headed by its label-with-unit (for example
//! `Energy (kWh)`). Timestamps are written as `%Y-%m-%d %H:%M:%S`
//! (timezone-naive) and values in Rust's shortest round-tripping float
//! form, so `load(save(d))` reproduces `d` exactly.
//!
//! Load is all-or-nothing: a parse failure anywhere leaves the caller's
//! dataset untouched. Which sensor columns are present is reported back
//! so the registry can be recomputed from the file contents.

use crate::domain::{Dataset, Reading, SensorKind};
use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

const TIMESTAMP_COLUMN: &str = "timestamp";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Dataset store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("first column must be '{TIMESTAMP_COLUMN}', found '{0}'")]
    MissingTimestampColumn(String),

    #[error("invalid timestamp at line {line}: '{value}'")]
    InvalidTimestamp { line: usize, value: String },

    #[error("invalid value for '{column}' at line {line}: '{value}'")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },
}

/// Serialize a dataset to CSV bytes.
pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);

        let mut header = vec![TIMESTAMP_COLUMN.to_string()];
        header.extend(dataset.kinds().iter().map(|k| k.column_label().to_string()));
        writer.write_record(&header)?;

        for reading in dataset.readings() {
            let mut record = vec![reading.timestamp.format(TIMESTAMP_FORMAT).to_string()];
            for &kind in dataset.kinds() {
                match reading.value(kind) {
                    Some(v) => record.push(v.to_string()),
                    None => record.push(String::new()),
                }
            }
            writer.write_record(&record)?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

/// Parse a dataset from CSV bytes.
///
/// The first column must be `timestamp`; remaining columns are matched
/// against the known sensor labels and unrecognized ones are skipped
/// with a warning. Active flags are recomputed by the caller from the
/// returned dataset's column set.
pub fn from_csv_bytes(bytes: &[u8]) -> Result<Dataset, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let first = headers.iter().next().unwrap_or("");
    if first != TIMESTAMP_COLUMN {
        return Err(StoreError::MissingTimestampColumn(first.to_string()));
    }

    // Column position -> sensor kind, None for columns we do not know.
    let mut columns: Vec<Option<SensorKind>> = Vec::with_capacity(headers.len() - 1);
    for label in headers.iter().skip(1) {
        let kind = SensorKind::from_column_label(label);
        if kind.is_none() {
            warn!(column = label, "skipping unrecognized sensor column");
        }
        columns.push(kind);
    }

    let kinds: Vec<SensorKind> = columns.iter().copied().flatten().collect();
    let mut dataset = Dataset::new(kinds);

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2; // header is line 1

        let raw_ts = record.get(0).unwrap_or("");
        let timestamp = NaiveDateTime::parse_from_str(raw_ts, TIMESTAMP_FORMAT).map_err(|_| {
            StoreError::InvalidTimestamp {
                line,
                value: raw_ts.to_string(),
            }
        })?;

        let mut reading = Reading::new(timestamp);
        for (position, kind) in columns.iter().enumerate() {
            let Some(kind) = kind else { continue };
            let raw = record.get(position + 1).unwrap_or("").trim();
            if raw.is_empty() {
                continue;
            }
            let value: f64 = raw.parse().map_err(|_| StoreError::InvalidValue {
                line,
                column: kind.column_label().to_string(),
                value: raw.to_string(),
            })?;
            reading.set_value(*kind, value);
        }
        dataset.push(reading);
    }

    info!(
        rows = dataset.len(),
        columns = dataset.kinds().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Write a dataset to a CSV file.
///
/// Saving an empty dataset is a silent no-op: no file is written.
pub fn save_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<(), StoreError> {
    if dataset.is_empty() {
        debug!("dataset is empty, skipping save");
        return Ok(());
    }

    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let bytes = to_csv_bytes(dataset)?;
    fs::write(path, bytes)?;
    info!(path = %path.display(), rows = dataset.len(), "saved dataset");
    Ok(())
}

/// Read a dataset from a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset, StoreError> {
    let bytes = fs::read(path.as_ref())?;
    from_csv_bytes(&bytes)
}
