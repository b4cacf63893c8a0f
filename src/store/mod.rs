//! Parquet-backed storage for OHLCV bars.
//!
//! One file per (symbol, timeframe) pair at
//! `<base>/<SYMBOL>/<timeframe>/bars.parquet`, columns
//! `timestamp, open, high, low, close, volume`. Every write is a full
//! read-merge-rewrite of the series: existing rows are loaded, incoming rows
//! overlay them by timestamp (last write wins), and the merged series replaces
//! the file atomically (write to a temp file, then rename) so a crash
//! mid-write never corrupts the previous version.
//!
//! Concurrent writers to the same series are not coordinated here; the last
//! replace wins. Callers needing that guarantee must serialize externally.

pub mod normalize;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use polars::prelude::{
    Column, DataFrame, DataType, ParquetReader, ParquetWriter, SerReader, SerWriter, TimeUnit,
};

use crate::errors::{Error, SchemaError, ValidationError};
use crate::models::bar::{Bar, RawBar};
use crate::models::timeframe::Timeframe;
pub use normalize::normalize_bar;

/// Columns every persisted series must carry, in on-disk order.
pub const REQUIRED_COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Outcome of a single [`write_bars`] call.
///
/// `input_rows` counts the normalized incoming bars before deduplication;
/// `total_rows` is the size of the merged series on disk afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    pub input_rows: usize,
    pub total_rows: usize,
}

/// Storage location for a series key. The symbol is uppercased, so distinct
/// keys never collide and case variants of one ticker share a series.
pub fn bar_file(base_path: &Path, symbol: &str, timeframe: Timeframe) -> PathBuf {
    base_path
        .join(symbol.to_uppercase())
        .join(timeframe.as_str())
        .join("bars.parquet")
}

/// Read the stored series for a key, sorted ascending by timestamp.
///
/// A key that was never written yields an empty vector, not an error. A file
/// that exists but lacks required columns fails with [`SchemaError`]; columns
/// of the wrong type (booleans included) fail with [`ValidationError`], so a
/// corrupted-but-readable file never leaks malformed bars.
pub fn read_bars(base_path: &Path, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, Error> {
    let path = bar_file(base_path, symbol, timeframe);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = fs::File::open(&path)?;
    let df = ParquetReader::new(file).finish()?;
    let mut bars = dataframe_to_bars(&df, &path)?;
    bars.sort_by_key(|bar| bar.timestamp);
    Ok(bars)
}

/// Normalize, merge and persist a batch of bars for a key.
///
/// Incoming bars are validated up front (fail-fast, nothing is touched on
/// disk if any bar is malformed), merged over the existing series with
/// last-write-wins semantics per timestamp, and the whole merged series
/// replaces the file. Writing the same batch twice is idempotent.
pub fn write_bars(
    base_path: &Path,
    symbol: &str,
    timeframe: Timeframe,
    bars: &[RawBar],
) -> Result<WriteResult, Error> {
    let incoming = bars
        .iter()
        .map(normalize_bar)
        .collect::<Result<Vec<_>, ValidationError>>()?;
    let existing = read_bars(base_path, symbol, timeframe)?;

    // Existing rows first, then incoming in input order: a BTreeMap keyed by
    // timestamp makes the overlay last-write-wins and the iteration sorted.
    let mut merged: BTreeMap<DateTime<Utc>, Bar> = BTreeMap::new();
    for bar in existing {
        merged.insert(bar.timestamp, bar);
    }
    for bar in &incoming {
        merged.insert(bar.timestamp, bar.clone());
    }
    let ordered: Vec<Bar> = merged.into_values().collect();

    let df = bars_to_dataframe(&ordered)?;
    let path = bar_file(base_path, symbol, timeframe);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    replace_parquet(&df, &path)?;

    log::debug!(
        "persisted {} rows for {}/{} ({} incoming)",
        ordered.len(),
        symbol.to_uppercase(),
        timeframe,
        incoming.len()
    );
    Ok(WriteResult {
        input_rows: incoming.len(),
        total_rows: ordered.len(),
    })
}

fn bars_to_dataframe(bars: &[Bar]) -> Result<DataFrame, Error> {
    let timestamps: Vec<i64> = bars.iter().map(|b| b.timestamp.timestamp_micros()).collect();
    let opens: Vec<f64> = bars.iter().map(|b| b.open).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    let df = DataFrame::new(vec![
        Column::new("timestamp".into(), timestamps)
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?,
        Column::new("open".into(), opens),
        Column::new("high".into(), highs),
        Column::new("low".into(), lows),
        Column::new("close".into(), closes),
        Column::new("volume".into(), volumes),
    ])?;
    Ok(df)
}

/// Write-new-then-replace: readers either see the old file or the new one,
/// never a torn write.
fn replace_parquet(df: &DataFrame, path: &Path) -> Result<(), Error> {
    let tmp_path = path.with_extension("parquet.tmp");
    let file = fs::File::create(&tmp_path)?;
    ParquetWriter::new(file).finish(&mut df.clone())?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

fn dataframe_to_bars(df: &DataFrame, path: &Path) -> Result<Vec<Bar>, Error> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError {
            path: path.display().to_string(),
            missing,
        }
        .into());
    }

    let timestamps = timestamp_column(df)?;
    let opens = numeric_column(df, "open")?;
    let highs = numeric_column(df, "high")?;
    let lows = numeric_column(df, "low")?;
    let closes = numeric_column(df, "close")?;
    let volumes = numeric_column(df, "volume")?;

    let mut bars = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        bars.push(Bar {
            timestamp: timestamps[i],
            open: opens[i],
            high: highs[i],
            low: lows[i],
            close: closes[i],
            volume: volumes[i],
        });
    }
    Ok(bars)
}

fn timestamp_column(df: &DataFrame) -> Result<Vec<DateTime<Utc>>, Error> {
    let column = df.column("timestamp")?;
    match column.dtype() {
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let ca = column.datetime()?;
            let mut values = Vec::with_capacity(ca.len());
            for i in 0..ca.len() {
                let raw = ca.get(i).ok_or_else(null_timestamp)?;
                values.push(instant_from_epoch(unit, raw).ok_or_else(|| {
                    Error::from(ValidationError::Timestamp {
                        value: raw.to_string(),
                    })
                })?);
            }
            Ok(values)
        }
        DataType::String => {
            let ca = column.str()?;
            let mut values = Vec::with_capacity(ca.len());
            for i in 0..ca.len() {
                let text = ca.get(i).ok_or_else(null_timestamp)?;
                values.push(normalize::parse_timestamp(text)?);
            }
            Ok(values)
        }
        other => Err(ValidationError::Timestamp {
            value: other.to_string(),
        }
        .into()),
    }
}

fn null_timestamp() -> Error {
    ValidationError::Timestamp {
        value: "null".to_string(),
    }
    .into()
}

fn instant_from_epoch(unit: TimeUnit, value: i64) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    }
}

fn numeric_column(df: &DataFrame, name: &'static str) -> Result<Vec<f64>, Error> {
    let column = df.column(name)?;
    match column.dtype() {
        DataType::Boolean => Err(ValidationError::BooleanNumeric { field: name }.into()),
        dtype if is_numeric_dtype(dtype) => {
            let casted = column.cast(&DataType::Float64)?;
            let ca = casted.f64()?;
            let mut values = Vec::with_capacity(ca.len());
            for i in 0..ca.len() {
                values.push(ca.get(i).ok_or_else(|| {
                    Error::from(ValidationError::NotNumeric {
                        field: name,
                        value: "null".to_string(),
                    })
                })?);
            }
            Ok(values)
        }
        other => Err(ValidationError::NotNumeric {
            field: name,
            value: other.to_string(),
        }
        .into()),
    }
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}
