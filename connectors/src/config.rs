use common::{Error, Result};
use std::path::PathBuf;

const DEFAULT_COINAPI_URL: &str = "https://rest.coinapi.io/v1/";

/// Connection settings for the CoinAPI REST endpoint
#[derive(Debug, Clone)]
pub struct CoinApiConfig {
    pub base_url: String,
    pub key: String,
}

impl CoinApiConfig {
    pub fn new(base_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            key: key.into(),
        }
    }

    /// Load settings from the environment; the API key is mandatory
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("COINAPI_BASE_URL").unwrap_or_else(|_| DEFAULT_COINAPI_URL.to_string());
        let key = std::env::var("COINAPI_KEY")
            .map_err(|_| Error::ConfigError("COINAPI_KEY environment variable not set".into()))?;

        Ok(Self { base_url, key })
    }
}

/// Location of the static price history used in test mode
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    pub path: PathBuf,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fixtures/test.json"),
        }
    }
}

impl FixtureConfig {
    pub fn from_env() -> Self {
        std::env::var("PRICECHART_FIXTURE_PATH")
            .map(|path| Self { path: path.into() })
            .unwrap_or_default()
    }
}
