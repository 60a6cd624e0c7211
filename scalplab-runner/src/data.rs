//! Bar loading.
//!
//! The engine only ever sees `Vec<Bar>`; where the bars come from is a
//! provider concern. The CSV adapter covers exported feeds with the
//! column layout `timestamp,open,high,low,close,volume`, where the
//! timestamp is either RFC3339 or epoch milliseconds (the upstream
//! aggregate feed used the latter).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use scalplab_core::domain::validate_series;
use scalplab_core::Bar;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read bar file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse bar row: {0}")]
    Csv(#[from] csv::Error),

    #[error("unparseable timestamp '{0}' (expected RFC3339 or epoch milliseconds)")]
    BadTimestamp(String),

    #[error("malformed bar series at row {0} (insane bar or non-increasing timestamp)")]
    MalformedSeries(usize),

    #[error("no bars in the requested range {start}..={end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

/// Source of bar series for a run. Implementations must return bars in
/// strictly increasing timestamp order.
pub trait BarProvider {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>, LoadError>;
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Reads one instrument's bars from a CSV file.
pub struct CsvBarProvider {
    path: PathBuf,
}

impl CsvBarProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BarProvider for CsvBarProvider {
    fn fetch(
        &self,
        _symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, LoadError> {
        let bars = load_bars_csv(&self.path)?;
        let filtered: Vec<Bar> = bars
            .into_iter()
            .filter(|b| {
                let day = b.timestamp.date_naive();
                day >= start && day <= end
            })
            .collect();
        if filtered.is_empty() {
            return Err(LoadError::EmptyRange { start, end });
        }
        Ok(filtered)
    }
}

/// Parse a timestamp cell: RFC3339 first, then epoch milliseconds.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, LoadError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(millis) = raw.parse::<i64>() {
        if let Some(ts) = DateTime::from_timestamp_millis(millis) {
            return Ok(ts);
        }
    }
    Err(LoadError::BadTimestamp(raw.to_string()))
}

/// Load and validate a full CSV bar file.
pub fn load_bars_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row?;
        bars.push(Bar {
            timestamp: parse_timestamp(&row.timestamp)?,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    validate_series(&bars).map_err(LoadError::MalformedSeries)?;
    Ok(bars)
}
