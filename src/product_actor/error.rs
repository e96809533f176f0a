use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::storage::StorageError;

/// Errors surfaced by stock operations.
#[derive(Debug, Error)]
pub enum StockError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Stock persistence error: {0}")]
    Persistence(#[source] StorageError),
    #[error("Persisted stock is malformed: {0}")]
    MalformedData(String),
    #[error("Could not encode stock: {0}")]
    Encode(String),
    #[error("Stock already hydrated")]
    AlreadyHydrated,
    #[error("Stock not loaded yet")]
    NotHydrated,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for StockError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => StockError::NotFound(id),
            FrameworkError::Persistence(e) => StockError::Persistence(e),
            FrameworkError::MalformedData(msg) => StockError::MalformedData(msg),
            FrameworkError::Encode(msg) => StockError::Encode(msg),
            FrameworkError::AlreadyHydrated => StockError::AlreadyHydrated,
            FrameworkError::NotHydrated => StockError::NotHydrated,
            e @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                StockError::ActorCommunicationError(e.to_string())
            }
        }
    }
}
