use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<StoreError> for common::Error {
    fn from(err: StoreError) -> Self {
        common::Error::StorageError(err.to_string())
    }
}
