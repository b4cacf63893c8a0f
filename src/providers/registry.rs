//! Maps provider names to concrete provider instances.

use crate::errors::{ConfigurationError, Error};
use crate::providers::errors::UnsupportedProviderError;
use crate::providers::polygon::{API_KEY_ENV, API_KEY_FLAG, PolygonProvider};
use crate::providers::synthetic::SyntheticProvider;
use crate::providers::DataProvider;

/// Names accepted by [`resolve`].
pub const SUPPORTED_PROVIDERS: &str = "local_parquet, polygon";

/// Build and return a boxed data provider for the supplied name.
///
/// The name is trimmed and lowercased before matching. `polygon` requires a
/// non-empty API key; `local_parquet` ignores the credential.
pub fn resolve(name: &str, api_key: Option<&str>) -> Result<Box<dyn DataProvider>, Error> {
    match name.trim().to_lowercase().as_str() {
        "local_parquet" => Ok(Box::new(SyntheticProvider::new())),
        "polygon" => {
            let key = api_key.filter(|key| !key.trim().is_empty()).ok_or(
                ConfigurationError::MissingApiKey {
                    provider: "polygon",
                    flag: API_KEY_FLAG,
                    env: API_KEY_ENV,
                },
            )?;
            Ok(Box::new(PolygonProvider::new(key)?))
        }
        _ => Err(UnsupportedProviderError {
            name: name.trim().to_string(),
            supported: SUPPORTED_PROVIDERS,
        }
        .into()),
    }
}
