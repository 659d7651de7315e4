use common::{config::DisplayConfig, models::Preferences, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{KeyValueStorage, StoreConfig};

/// Reads and writes the user's fiat/crypto/auto-apply selection
pub struct PreferenceStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    display: DisplayConfig,
}

impl PreferenceStore {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        config: &StoreConfig,
        display: DisplayConfig,
    ) -> Self {
        Self {
            storage,
            key: config.key.clone(),
            display,
        }
    }

    /// Load the stored preferences.
    ///
    /// Never fails: a missing, unreadable or corrupt value yields the configured
    /// defaults, and each field of a readable value is normalized on its own.
    pub async fn get(&self) -> Preferences {
        let raw = match self.storage.get_item(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No preferences stored under '{}', using defaults", self.key);
                return self.display.default_preferences();
            }
            Err(e) => {
                warn!("Failed to read stored preferences: {}", e);
                return self.display.default_preferences();
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring unparsable stored preferences: {}", e);
                return self.display.default_preferences();
            }
        };

        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);

        self.normalize_fields(fields)
    }

    /// Persist a selection. Codes are normalized before writing so storage only
    /// ever holds allow-listed values.
    pub async fn set(&self, fiat: &str, crypto: &str, auto_apply: bool) -> Result<Preferences> {
        let prefs = Preferences {
            fiat: self.display.currencies.normalize_fiat(Some(fiat)),
            crypto: self.display.currencies.normalize_crypto(Some(crypto)),
            auto_apply,
        };

        let serialized = serde_json::to_string(&prefs).map_err(|e| {
            common::Error::ParseError(format!("Failed to serialize preferences: {}", e))
        })?;

        self.storage.set_item(&self.key, &serialized).await?;

        debug!(
            "Stored preferences {}/{} (auto-apply: {})",
            prefs.crypto, prefs.fiat, prefs.auto_apply
        );

        Ok(prefs)
    }

    /// Rewrite only the auto-apply flag, keeping the stored currencies
    pub async fn set_auto_apply(&self, auto_apply: bool) -> Result<Preferences> {
        let current = self.get().await;
        self.set(&current.fiat, &current.crypto, auto_apply).await
    }

    fn normalize_fields(&self, fields: &Map<String, Value>) -> Preferences {
        let currencies = &self.display.currencies;

        let auto_apply = match fields.get("autoApply") {
            None | Some(Value::Null) => self.display.form.auto_apply,
            Some(value) => is_truthy(value),
        };

        Preferences {
            fiat: currencies.normalize_fiat(fields.get("fiat").and_then(Value::as_str)),
            crypto: currencies.normalize_crypto(fields.get("crypto").and_then(Value::as_str)),
            auto_apply,
        }
    }
}

// Boolean coercion matching what browsers stored values were written with
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
