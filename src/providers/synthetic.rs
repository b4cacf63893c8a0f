//! Deterministic synthetic bar generator.
//!
//! No network; used for offline demonstration and as a fixture source in
//! tests. The generated close prices increase monotonically on purpose so
//! downstream assertions stay deterministic; this is not a market model.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};

use crate::errors::{Error, ValidationError};
use crate::models::bar::{RawBar, RawValue};
use crate::models::timeframe::Timeframe;
use crate::providers::{DataProvider, DownloadResult};
use crate::store;

/// Offline provider, registered as `local_parquet`.
#[derive(Debug, Default)]
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Generate bars from `start` through `end` inclusive, one per timeframe
/// step starting at UTC midnight.
///
/// The per-symbol seed (sum of char codes of the uppercased symbol, mod 25)
/// keeps different symbols visibly distinct while staying reproducible.
pub fn generate_bars(
    symbol: &str,
    timeframe: Timeframe,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<RawBar>, ValidationError> {
    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }

    let seed = symbol_seed(symbol) as f64;
    let step = timeframe.step();
    let end_ts = end.and_time(NaiveTime::MIN).and_utc();
    let mut ts = start.and_time(NaiveTime::MIN).and_utc();
    let mut index: i64 = 0;
    let mut bars = Vec::new();

    while ts <= end_ts {
        let close = 100.0 + seed + index as f64 * 0.5;
        bars.push(RawBar {
            timestamp: Some(RawValue::Timestamp(ts)),
            open: Some(RawValue::Float(close - 0.2)),
            high: Some(RawValue::Float(close + 0.5)),
            low: Some(RawValue::Float(close - 0.7)),
            close: Some(RawValue::Float(close)),
            volume: Some(RawValue::Int(1_000 + index * 10)),
        });
        ts += step;
        index += 1;
    }

    Ok(bars)
}

fn symbol_seed(symbol: &str) -> u32 {
    symbol.to_uppercase().chars().map(|ch| ch as u32).sum::<u32>() % 25
}

impl DataProvider for SyntheticProvider {
    fn download(
        &self,
        base_path: &Path,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DownloadResult, Error> {
        let bars = generate_bars(symbol, timeframe, start, end)?;
        let result = store::write_bars(base_path, symbol, timeframe, &bars)?;
        Ok(DownloadResult {
            symbol: symbol.to_uppercase(),
            timeframe,
            input_rows: result.input_rows,
            total_rows: result.total_rows,
        })
    }
}
