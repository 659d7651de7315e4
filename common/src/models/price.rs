use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fiat/crypto pair a price history is requested for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub fiat: String,   // Quote currency (e.g., USD)
    pub crypto: String, // Base asset (e.g., BTC)
}

impl CurrencyPair {
    pub fn new(fiat: impl Into<String>, crypto: impl Into<String>) -> Self {
        Self {
            fiat: fiat.into(),
            crypto: crypto.into(),
        }
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.crypto, self.fiat)
    }
}

/// One exchange-rate period as returned by the quote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Start of the aggregation period
    #[serde(rename = "time_period_start")]
    pub timestamp: DateTime<Utc>,
    /// Rate at the opening of the period
    #[serde(rename = "rate_open")]
    pub open_rate: f64,
}

/// Parallel label/value sequences ready for charting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
