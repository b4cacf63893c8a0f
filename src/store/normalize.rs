//! Validation and coercion of raw bar records into canonical [`Bar`]s.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::errors::ValidationError;
use crate::models::bar::{Bar, RawBar, RawValue};

/// Validate and coerce one raw record. Pure; collects every missing field
/// name before failing so callers see the whole problem at once.
pub fn normalize_bar(raw: &RawBar) -> Result<Bar, ValidationError> {
    match (
        &raw.timestamp,
        &raw.open,
        &raw.high,
        &raw.low,
        &raw.close,
        &raw.volume,
    ) {
        (Some(timestamp), Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
            Ok(Bar {
                timestamp: coerce_timestamp(timestamp)?,
                open: coerce_number(open, "open")?,
                high: coerce_number(high, "high")?,
                low: coerce_number(low, "low")?,
                close: coerce_number(close, "close")?,
                volume: coerce_number(volume, "volume")?,
            })
        }
        _ => Err(ValidationError::MissingFields {
            fields: missing_fields(raw),
        }),
    }
}

fn missing_fields(raw: &RawBar) -> Vec<String> {
    [
        ("timestamp", &raw.timestamp),
        ("open", &raw.open),
        ("high", &raw.high),
        ("low", &raw.low),
        ("close", &raw.close),
        ("volume", &raw.volume),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_none())
    .map(|(name, _)| name.to_string())
    .collect()
}

fn coerce_timestamp(value: &RawValue) -> Result<DateTime<Utc>, ValidationError> {
    match value {
        RawValue::Timestamp(ts) => Ok(*ts),
        RawValue::Text(text) => parse_timestamp(text),
        other => Err(ValidationError::Timestamp {
            value: other.to_string(),
        }),
    }
}

/// Parse an ISO-8601 timestamp string. An explicit offset is converted to
/// UTC; a naive datetime or bare date is assumed to already be UTC.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ValidationError::Timestamp {
        value: value.to_string(),
    })
}

fn coerce_number(value: &RawValue, field: &'static str) -> Result<f64, ValidationError> {
    match value {
        RawValue::Bool(_) => Err(ValidationError::BooleanNumeric { field }),
        RawValue::Int(v) => Ok(*v as f64),
        RawValue::Float(v) => Ok(*v),
        RawValue::Text(text) => {
            text.trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::NotNumeric {
                    field,
                    value: value.to_string(),
                })
        }
        RawValue::Timestamp(_) => Err(ValidationError::NotNumeric {
            field,
            value: value.to_string(),
        }),
    }
}
