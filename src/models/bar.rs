//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! [`Bar`] is the normalized output of the store and the unit every
//! [`DataProvider`](crate::providers::DataProvider) ultimately produces.
//! [`RawBar`] is its loosely-typed precursor: providers assemble raw field
//! values as they arrive from a vendor payload or a generator, and the
//! normalizer turns them into `Bar`s or rejects them.

use std::fmt;

use chrono::{DateTime, Utc};

/// A single normalized OHLCV bar for a given timestamp.
///
/// Vendor-agnostic. No economic consistency is enforced between the price
/// fields (`high >= low` is not checked); only numeric validity is.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// The timestamp for this bar (UTC). Unique within a stored series.
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval. Stored as provided.
    pub volume: f64,
}

/// A single field value as delivered by a provider, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// An already-typed UTC instant.
    Timestamp(DateTime<Utc>),
    /// Text; parsed as ISO-8601 for timestamps, as a float for prices.
    Text(String),
    Int(i64),
    Float(f64),
    /// Representable so the normalizer can reject it explicitly.
    Bool(bool),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Timestamp(ts) => write!(f, "{ts}"),
            RawValue::Text(text) => write!(f, "\"{text}\""),
            RawValue::Int(value) => write!(f, "{value}"),
            RawValue::Float(value) => write!(f, "{value}"),
            RawValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// An unvalidated bar record: one optional [`RawValue`] per required field.
///
/// `None` means the field was absent from the source record, which the
/// normalizer reports by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBar {
    pub timestamp: Option<RawValue>,
    pub open: Option<RawValue>,
    pub high: Option<RawValue>,
    pub low: Option<RawValue>,
    pub close: Option<RawValue>,
    pub volume: Option<RawValue>,
}

impl RawBar {
    /// A fully-populated raw bar from typed values.
    pub fn from_values(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp: Some(RawValue::Timestamp(timestamp)),
            open: Some(RawValue::Float(open)),
            high: Some(RawValue::Float(high)),
            low: Some(RawValue::Float(low)),
            close: Some(RawValue::Float(close)),
            volume: Some(RawValue::Float(volume)),
        }
    }
}
