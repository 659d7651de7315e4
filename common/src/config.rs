use serde::{Deserialize, Serialize};

use crate::models::Preferences;

/// Allow-list of currency codes with the code used when a value is unknown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyList {
    pub default: String,
    pub available: Vec<String>,
}

impl CurrencyList {
    pub fn new(default: &str, available: &[&str]) -> Self {
        Self {
            default: default.to_string(),
            available: available.iter().map(|code| code.to_string()).collect(),
        }
    }

    /// Map a raw code onto the allow-list, falling back to the default
    pub fn normalize(&self, value: Option<&str>) -> String {
        if let Some(value) = value {
            let code = value.to_uppercase();
            if self.contains(&code) {
                return code;
            }
        }

        self.default.clone()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.available.iter().any(|available| available == code)
    }
}

/// Currencies offered in the fiat and crypto selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub fiat: CurrencyList,
    pub crypto: CurrencyList,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            fiat: CurrencyList::new("USD", &["USD", "EUR", "CZK", "JPY", "GBP"]),
            crypto: CurrencyList::new(
                "BTC",
                &["BTC", "ETH", "LTC", "DOGE", "XRP", "ADA", "SOL", "DOT"],
            ),
        }
    }
}

impl CurrencyConfig {
    pub fn normalize_fiat(&self, value: Option<&str>) -> String {
        self.fiat.normalize(value)
    }

    pub fn normalize_crypto(&self, value: Option<&str>) -> String {
        self.crypto.normalize(value)
    }
}

/// Form defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Initial state of the auto-apply checkbox
    pub auto_apply: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self { auto_apply: false }
    }
}

/// Styling of the price line and the drag-zoom selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub line_color: String,
    pub tension: f64,
    pub drag_bg_color: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_color: "#0d6efd".to_string(),
            tension: 0.4,
            drag_bg_color: "rgba(13, 109, 253, 0.2)".to_string(),
        }
    }
}

/// Static display configuration shared by the store, chart and controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub currencies: CurrencyConfig,
    pub form: FormConfig,
    pub chart: ChartStyle,
}

impl DisplayConfig {
    /// Preferences used when nothing valid has been stored yet
    pub fn default_preferences(&self) -> Preferences {
        Preferences {
            fiat: self.currencies.fiat.default.clone(),
            crypto: self.currencies.crypto.default.clone(),
            auto_apply: self.form.auto_apply,
        }
    }
}
