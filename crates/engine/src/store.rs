//! Document persistence.
//!
//! A [`DocumentStore`] keeps JSON documents grouped into named collections,
//! each document addressed by a string key. The engine only needs two
//! operations: write one document and read back a whole collection.
//!
//! Backends:
//! - [`DirectoryStore`]: one file per document on the local file system.
//! - [`SqliteStore`]: one row per document in a sea-orm managed table.

use async_trait::async_trait;
use serde_json::Value;

use crate::{EngineError, ResultEngine};

pub use directory::DirectoryStore;
pub use sqlite::SqliteStore;

mod directory;
mod documents;
mod sqlite;

#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Store `document` under `key` in `collection`, replacing any document
    /// already stored under the same key.
    async fn put(&self, collection: &str, key: &str, document: &Value) -> ResultEngine<()>;

    /// Every document of `collection`, in no particular order.
    ///
    /// A collection that was never written is empty.
    async fn get_all(&self, collection: &str) -> ResultEngine<Vec<Value>>;
}

/// Reject names that are empty or could escape their collection.
pub(crate) fn validate_name(label: &str, value: &str) -> ResultEngine<()> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0'])
    {
        return Err(EngineError::Persistence(format!(
            "invalid {label} name: {value:?}"
        )));
    }
    Ok(())
}
