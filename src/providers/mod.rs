//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the unified interface for
//! downloading time-series bars from any source and persisting them through
//! the bar store. Each concrete implementation (the synthetic generator, the
//! Polygon aggregates API) handles source-specific validation and then
//! delegates to [`store::write_bars`](crate::store::write_bars).
//!
//! The trait supports dynamic dispatch (`Box<dyn DataProvider>`) so the
//! [`registry`] can select a provider at runtime by name.

pub mod errors;
pub mod polygon;
pub mod registry;
pub mod synthetic;

use std::path::Path;

use chrono::NaiveDate;

use crate::errors::Error;
use crate::models::timeframe::Timeframe;

/// Outcome of a successful download, reported per symbol.
///
/// The row counters are taken directly from the store's
/// [`WriteResult`](crate::store::WriteResult).
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadResult {
    /// Requested symbol, uppercased.
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Bars handed to the store in this call, before deduplication.
    pub input_rows: usize,
    /// Size of the merged series after the write.
    pub total_rows: usize,
}

/// Minimal interface for pluggable bar download providers.
///
/// `start` and `end` are inclusive calendar-date bounds interpreted at UTC
/// midnight. On success the bars have already been persisted.
pub trait DataProvider: Send + Sync + std::fmt::Debug {
    fn download(
        &self,
        base_path: &Path,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DownloadResult, Error>;
}
