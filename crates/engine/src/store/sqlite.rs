//! SQLite backend: one row of the `documents` table per document.
//!
//! The table is created by the `migration` crate; run the migrator on the
//! connection before handing it to [`SqliteStore::new`].

use async_trait::async_trait;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};
use serde_json::Value;

use super::{DocumentStore, documents, validate_name};
use crate::{EngineError, ResultEngine};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    database: DatabaseConnection,
}

impl SqliteStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn put(&self, collection: &str, key: &str, document: &Value) -> ResultEngine<()> {
        validate_name("collection", collection)?;
        validate_name("key", key)?;

        let row = documents::ActiveModel {
            collection: ActiveValue::Set(collection.to_string()),
            key: ActiveValue::Set(key.to_string()),
            body: ActiveValue::Set(serde_json::to_string(document)?),
        };
        documents::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([documents::Column::Collection, documents::Column::Key])
                    .update_column(documents::Column::Body)
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    async fn get_all(&self, collection: &str) -> ResultEngine<Vec<Value>> {
        validate_name("collection", collection)?;

        let rows = documents::Entity::find()
            .filter(documents::Column::Collection.eq(collection))
            .order_by_asc(documents::Column::Key)
            .all(&self.database)
            .await?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_str::<Value>(&row.body).map_err(|err| {
                    EngineError::Persistence(format!("{collection}/{}: {err}", row.key))
                })
            })
            .collect()
    }
}
