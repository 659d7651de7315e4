mod config;
mod error;
mod preference_store;
mod storage;

pub use config::StoreConfig;
pub use error::StoreError;
pub use preference_store::PreferenceStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
