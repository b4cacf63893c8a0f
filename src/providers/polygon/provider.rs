use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::errors::{ConfigurationError, Error};
use crate::models::timeframe::Timeframe;
use crate::providers::errors::ProviderError;
use crate::providers::polygon::response::bars_from_payload;
use crate::providers::{DataProvider, DownloadResult};
use crate::store;

const BASE_URL: &str = "https://api.polygon.io/v2/aggs/ticker";
/// Result-set cap requested from the endpoint. Ranges whose true result set
/// exceeds this are silently truncated by the vendor; no pagination is done.
const RESULT_LIMIT: u32 = 50_000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable consulted for the API key when no flag is given.
pub const API_KEY_ENV: &str = "POLYGON_API_KEY";
/// CLI flag that supplies the API key.
pub const API_KEY_FLAG: &str = "--api-key";

/// Fetches one JSON document over HTTP.
///
/// Kept as a trait so the payload parsing and persistence path can be
/// exercised in tests against a canned response, without a live network call.
pub trait FetchJson: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Value, Error>;
}

struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl FetchJson for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Value, Error> {
        let response = self.client.get(url).send().map_err(ProviderError::Request)?;
        if !response.status().is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api(message).into());
        }
        let payload = response.json::<Value>().map_err(ProviderError::Request)?;
        Ok(payload)
    }
}

/// Downloads bars from the Polygon aggregates endpoint and persists them to
/// the local parquet store.
pub struct PolygonProvider {
    api_key: SecretString,
    fetcher: Box<dyn FetchJson>,
}

impl std::fmt::Debug for PolygonProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonProvider").finish_non_exhaustive()
    }
}

impl PolygonProvider {
    /// Creates a provider backed by a blocking HTTP client with a bounded
    /// request timeout. One GET per download; no retries.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ProviderError::Request)?;
        Self::with_fetcher(api_key, Box::new(HttpFetcher { client }))
    }

    /// Creates a provider with an injected fetcher (used in tests).
    pub fn with_fetcher(api_key: &str, fetcher: Box<dyn FetchJson>) -> Result<Self, Error> {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::EmptyApiKey { provider: "polygon" }.into());
        }
        Ok(Self {
            api_key: SecretString::new(trimmed.into()),
            fetcher,
        })
    }

    fn aggregates_url(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> String {
        let (multiplier, timespan) = aggregate_window(timeframe);
        format!(
            "{BASE_URL}/{}/range/{multiplier}/{timespan}/{}/{}\
             ?adjusted=true&sort=asc&limit={RESULT_LIMIT}&apiKey={}",
            symbol.to_uppercase(),
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            self.api_key.expose_secret(),
        )
    }
}

fn aggregate_window(timeframe: Timeframe) -> (u32, &'static str) {
    match timeframe {
        Timeframe::OneMinute => (1, "minute"),
        Timeframe::OneHour => (1, "hour"),
        Timeframe::OneDay => (1, "day"),
    }
}

impl DataProvider for PolygonProvider {
    fn download(
        &self,
        base_path: &Path,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DownloadResult, Error> {
        log::debug!("requesting aggregates for {}/{timeframe}", symbol.to_uppercase());
        let url = self.aggregates_url(symbol, timeframe, start, end);
        let payload = self.fetcher.fetch(&url)?;
        let bars = bars_from_payload(&payload)?;
        let result = store::write_bars(base_path, symbol, timeframe, &bars)?;
        Ok(DownloadResult {
            symbol: symbol.to_uppercase(),
            timeframe,
            input_rows: result.input_rows,
            total_rows: result.total_rows,
        })
    }
}
