use thiserror::Error;

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success HTTP status.
    #[error("API error: {0}")]
    Api(String),

    /// The payload parsed, but its `status` field reports a failure.
    #[error("aggregates request failed with status={status}: {detail}")]
    Status { status: String, detail: String },

    /// The payload does not have the expected shape.
    #[error("malformed aggregates payload: {0}")]
    Payload(String),
}

/// A provider name outside the supported set was requested.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported provider '{name}', expected one of: {supported}")]
pub struct UnsupportedProviderError {
    pub name: String,
    pub supported: &'static str,
}
