//! The module contains the errors the engine can throw.
//!
//! Every variant except [`MissingStore`] is a persistence failure: the
//! backing medium could not be written, read, or one of its documents could
//! not be decoded.
//!
//!  [`MissingStore`]: EngineError::MissingStore
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Persistence(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Engine built without a document store")]
    MissingStore,
}

impl EngineError {
    /// Whether the error comes from the storage layer.
    pub fn is_persistence(&self) -> bool {
        !matches!(self, Self::MissingStore)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Persistence(a), Self::Persistence(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Serialization(a), Self::Serialization(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::MissingStore, Self::MissingStore) => true,
            _ => false,
        }
    }
}
