use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Invalid rating: {0}")]
    InvalidRating(String),
    #[error("Invalid product name: {0}")]
    InvalidName(String),
    #[error("No product ids left after {0}")]
    IdsExhausted(i64),
    #[error("Catalog persistence error: {0}")]
    Persistence(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed at `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode catalog: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
    #[error("storage lock poisoned: {0}")]
    Poisoned(String),
}

impl From<StorageError> for CatalogError {
    fn from(value: StorageError) -> Self {
        CatalogError::Persistence(value.to_string())
    }
}
