//! Deduplicated, time-ordered OHLCV bar storage with pluggable download
//! providers.
//!
//! The store persists bars per (symbol, timeframe) in parquet files and
//! merges every write over the existing series (last write wins per
//! timestamp). Providers (a deterministic synthetic generator and the
//! Polygon aggregates API) download bars and persist them through the same
//! write path. The four calls the rest of an application needs are
//! re-exported at the crate root: [`resolve`], [`DataProvider::download`],
//! [`read_bars`] and [`write_bars`].

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod store;

pub use errors::{ConfigurationError, Error, SchemaError, ValidationError};
pub use models::bar::{Bar, RawBar, RawValue};
pub use models::timeframe::{Timeframe, UnsupportedTimeframeError};
pub use providers::registry::resolve;
pub use providers::{DataProvider, DownloadResult};
pub use store::{read_bars, write_bars, WriteResult};
