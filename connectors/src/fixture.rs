use crate::{sort_oldest_first, FixtureConfig, QuoteSource};
use async_trait::async_trait;
use common::{
    models::{CurrencyPair, PriceObservation},
    Error, Result,
};
use std::path::PathBuf;
use tracing::debug;

/// Serves a recorded price history from disk, whatever pair is requested
pub struct FixtureConnector {
    path: PathBuf,
}

impl FixtureConnector {
    pub fn new(config: &FixtureConfig) -> Self {
        Self {
            path: config.path.clone(),
        }
    }
}

#[async_trait]
impl QuoteSource for FixtureConnector {
    async fn get_time_series(&self, pair: &CurrencyPair) -> Result<Vec<PriceObservation>> {
        debug!(
            "Loading fixture {} in place of {} history",
            self.path.display(),
            pair
        );

        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::NotFound(format!("Fixture {} unavailable: {}", self.path.display(), e))
        })?;

        let mut observations: Vec<PriceObservation> = serde_json::from_str(&contents)
            .map_err(|e| Error::ParseError(format!("Failed to parse fixture: {}", e)))?;

        sort_oldest_first(&mut observations);

        Ok(observations)
    }
}
