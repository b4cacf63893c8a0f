//! Timeframe of a bar series.
//!
//! The store and both providers support exactly three bar intervals, so the
//! timeframe is a closed enum rather than an open `(amount, unit)` pair.
//! `FromStr`/`Display` give CLI ergonomics (`"1m"`, `"1h"`, `"1d"`); parsing
//! anything else is the one place an unsupported timeframe can surface.

use std::{fmt, str::FromStr};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A timeframe string outside the supported set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported timeframe '{value}', expected one of: 1m, 1h, 1d")]
pub struct UnsupportedTimeframeError {
    pub value: String,
}

/// Bar interval of a stored series. Forms part of the storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::OneMinute, Timeframe::OneHour, Timeframe::OneDay];

    /// The canonical string form, used in storage paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::OneHour => "1h",
            Timeframe::OneDay => "1d",
        }
    }

    /// Distance between consecutive bars of this timeframe.
    pub fn step(self) -> Duration {
        match self {
            Timeframe::OneMinute => Duration::minutes(1),
            Timeframe::OneHour => Duration::hours(1),
            Timeframe::OneDay => Duration::days(1),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = UnsupportedTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Timeframe::OneMinute),
            "1h" => Ok(Timeframe::OneHour),
            "1d" => Ok(Timeframe::OneDay),
            other => Err(UnsupportedTimeframeError {
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_values() {
        assert_eq!("1m".parse::<Timeframe>().unwrap(), Timeframe::OneMinute);
        assert_eq!("1h".parse::<Timeframe>().unwrap(), Timeframe::OneHour);
        assert_eq!("1d".parse::<Timeframe>().unwrap(), Timeframe::OneDay);
    }

    #[test]
    fn rejects_unknown_values_naming_the_allowed_set() {
        let err = "5m".parse::<Timeframe>().unwrap_err();
        assert_eq!(err.value, "5m");
        let message = err.to_string();
        assert!(message.contains("'5m'"));
        assert!(message.contains("1m, 1h, 1d"));
        assert!("1D".parse::<Timeframe>().is_err());
        assert!("".parse::<Timeframe>().is_err());
    }

    #[test]
    fn display_matches_storage_form() {
        for timeframe in Timeframe::ALL {
            assert_eq!(
                timeframe.as_str().parse::<Timeframe>().unwrap(),
                timeframe
            );
        }
        assert_eq!(Timeframe::OneDay.to_string(), "1d");
    }
}
