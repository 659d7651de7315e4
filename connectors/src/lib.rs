pub mod coinapi;
pub mod config;
pub mod fixture;

use async_trait::async_trait;
use common::{
    models::{CurrencyPair, PriceObservation},
    Result,
};

pub use config::{CoinApiConfig, FixtureConfig};

/// Trait defining the interface for price history sources
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Get the price history of a pair over the trailing month, oldest first
    async fn get_time_series(&self, pair: &CurrencyPair) -> Result<Vec<PriceObservation>>;
}

pub(crate) fn sort_oldest_first(observations: &mut [PriceObservation]) {
    observations.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
}
