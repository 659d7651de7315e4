use std::path::PathBuf;

/// Configuration for the preference storage
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// File holding the persisted key-value pairs
    pub path: PathBuf,
    /// Key the serialized preferences are stored under
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".pricechart/storage.json"),
            key: "config".to_string(),
        }
    }
}

impl StoreConfig {
    /// Create a new store configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let path = std::env::var("PRICECHART_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.path);
        let key = std::env::var("PRICECHART_STORAGE_KEY").unwrap_or(defaults.key);

        Self { path, key }
    }
}
