//! Validation of the aggregates JSON payload.
//!
//! The response is untrusted input, so it is walked field by field instead of
//! blindly deserialized: every rejection names the offending field.
//!
//! Shape consumed:
//! ```text
//! { "status": "OK"|other, "results": [ {"t": <int ms>, "o","h","l","c","v": <num>}, ... ],
//!   "error"?: str, "message"?: str }
//! ```

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::errors::{Error, ValidationError};
use crate::models::bar::{RawBar, RawValue};
use crate::providers::errors::ProviderError;

/// Validate a payload and convert its rows into raw bars.
pub(crate) fn bars_from_payload(payload: &Value) -> Result<Vec<RawBar>, Error> {
    let object = payload
        .as_object()
        .ok_or_else(|| ProviderError::Payload("response must be a JSON object".to_string()))?;
    check_status(object)?;

    match object.get("results") {
        None => Ok(Vec::new()),
        Some(Value::Array(rows)) => {
            let mut bars = Vec::with_capacity(rows.len());
            for row in rows {
                bars.push(bar_from_row(row)?);
            }
            Ok(bars)
        }
        Some(_) => {
            Err(ProviderError::Payload("field 'results' must be a list".to_string()).into())
        }
    }
}

/// A non-empty `status` other than "OK" (case-insensitive) is a failure; the
/// vendor reports the reason in `error` or `message`.
fn check_status(object: &Map<String, Value>) -> Result<(), Error> {
    let status = match object.get("status") {
        None => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    if status.is_empty() || status.eq_ignore_ascii_case("OK") {
        return Ok(());
    }

    let detail = [object.get("error"), object.get("message")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|text| !text.is_empty())
        .unwrap_or("unknown_error")
        .to_string();
    Err(ProviderError::Status {
        status: status.to_uppercase(),
        detail,
    }
    .into())
}

fn bar_from_row(row: &Value) -> Result<RawBar, Error> {
    let object = row
        .as_object()
        .ok_or_else(|| ProviderError::Payload("bar row must be an object".to_string()))?;

    let millis = epoch_millis(object.get("t"))?;
    let timestamp = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        Error::from(ValidationError::Timestamp {
            value: millis.to_string(),
        })
    })?;

    Ok(RawBar {
        timestamp: Some(RawValue::Timestamp(timestamp)),
        open: Some(numeric_field(object.get("o"), "o")?),
        high: Some(numeric_field(object.get("h"), "h")?),
        low: Some(numeric_field(object.get("l"), "l")?),
        close: Some(numeric_field(object.get("c"), "c")?),
        volume: Some(numeric_field(object.get("v"), "v")?),
    })
}

fn epoch_millis(value: Option<&Value>) -> Result<i64, Error> {
    match value {
        Some(Value::Bool(_)) => Err(ValidationError::BooleanNumeric { field: "t" }.into()),
        Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
            Error::from(ValidationError::NotInteger {
                field: "t",
                value: number.to_string(),
            })
        }),
        other => Err(ValidationError::NotInteger {
            field: "t",
            value: describe(other),
        }
        .into()),
    }
}

fn numeric_field(value: Option<&Value>, field: &'static str) -> Result<RawValue, Error> {
    match value {
        Some(Value::Bool(_)) => Err(ValidationError::BooleanNumeric { field }.into()),
        Some(Value::Number(number)) => number.as_f64().map(RawValue::Float).ok_or_else(|| {
            Error::from(ValidationError::NotNumeric {
                field,
                value: number.to_string(),
            })
        }),
        Some(Value::String(text)) => {
            text.trim()
                .parse::<f64>()
                .map(RawValue::Float)
                .map_err(|_| {
                    Error::from(ValidationError::NotNumeric {
                        field,
                        value: format!("\"{text}\""),
                    })
                })
        }
        other => Err(ValidationError::NotNumeric {
            field,
            value: describe(other),
        }
        .into()),
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "missing".to_string(),
        Some(value) => value.to_string(),
    }
}
