use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// A raw bar failed normalization into the canonical representation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// One or more of the six required fields is absent.
    #[error("bar is missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// The timestamp value is neither an instant nor a parsable ISO-8601 string.
    #[error("unsupported timestamp value: {value}")]
    Timestamp { value: String },

    /// A price/volume field holds a value that cannot be coerced to a float.
    #[error("field {field} must be numeric, got {value}")]
    NotNumeric { field: &'static str, value: String },

    /// A field that must be an integer holds something else.
    #[error("field {field} must be an integer, got {value}")]
    NotInteger { field: &'static str, value: String },

    /// Booleans are rejected for numeric fields even where a language would
    /// happily coerce them.
    #[error("field {field} must be numeric, got bool")]
    BooleanNumeric { field: &'static str },

    /// A requested date range runs backwards.
    #[error("end date {end} must be on or after start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// A persisted series file does not carry the required bar columns.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("stored bars at {path} are missing required columns: {}", missing.join(", "))]
pub struct SchemaError {
    pub path: String,
    pub missing: Vec<String>,
}

/// An error related to application configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A provider was selected that needs a credential, but none was supplied.
    #[error("provider '{provider}' requires {flag} or {env}")]
    MissingApiKey {
        provider: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    /// A credential was supplied but is empty or whitespace-only.
    #[error("provider '{provider}' requires a non-empty API key")]
    EmptyApiKey { provider: &'static str },

    /// A config file exists but does not deserialize into the expected shape.
    #[error("invalid config at {}: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },
}

/// The unified error type for the `bar_ingestor` crate.
///
/// Every granular error the store and providers can raise converts into this
/// via `From`, so the library surface is a single fallible type while callers
/// can still match on the concrete failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Timeframe(#[from] crate::models::timeframe::UnsupportedTimeframeError),

    #[error(transparent)]
    Provider(#[from] crate::providers::errors::ProviderError),

    #[error(transparent)]
    UnsupportedProvider(#[from] crate::providers::errors::UnsupportedProviderError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Polars library.
    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
