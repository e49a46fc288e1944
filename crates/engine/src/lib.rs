//! Register bookkeeping engine.
//!
//! The [`Engine`] persists registers through a [`DocumentStore`] and answers
//! queries by filtering a fresh snapshot of the `registers` collection.

use chrono::Utc;
use std::sync::Arc;

pub use error::EngineError;
pub use query::{
    CONSUMPTION_WINDOW_HOURS, RegisterFilter, filter_registers, sum_monthly_consumption,
};
pub use registers::{COLLECTION, Register, RegisterNew};
pub use store::{DirectoryStore, DocumentStore, SqliteStore};

mod error;
mod query;
mod registers;
mod store;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug, Clone)]
pub struct Engine {
    store: Arc<dyn DocumentStore>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Assign an id to `new` and persist it.
    pub async fn create_register(&self, new: RegisterNew) -> ResultEngine<Register> {
        let register = Register::from_new(new, Utc::now());
        let document = serde_json::to_value(&register)?;
        self.store
            .put(COLLECTION, &register.key(), &document)
            .await?;
        tracing::debug!("stored register {}", register.id);
        Ok(register)
    }

    /// Snapshot of every stored register.
    ///
    /// Fails on the first document that does not decode as a register.
    pub async fn registers(&self) -> ResultEngine<Vec<Register>> {
        self.store
            .get_all(COLLECTION)
            .await?
            .into_iter()
            .map(|document| {
                serde_json::from_value::<Register>(document).map_err(|err| {
                    EngineError::Persistence(format!("invalid register document: {err}"))
                })
            })
            .collect()
    }

    /// Registers matching `filter`.
    pub async fn find_registers(&self, filter: &RegisterFilter) -> ResultEngine<Vec<Register>> {
        let snapshot = self.registers().await?;
        Ok(filter_registers(&snapshot, filter))
    }

    /// Rolling 30 day consumption of `name` in `currency`.
    pub async fn month_consumption(&self, name: &str, currency: &str) -> ResultEngine<f64> {
        let snapshot = self.registers().await?;
        Ok(sum_monthly_consumption(
            &snapshot,
            name,
            currency,
            Utc::now(),
        ))
    }
}

/// The builder for `Engine`
#[derive(Default, Debug)]
pub struct EngineBuilder {
    store: Option<Arc<dyn DocumentStore>>,
}

impl EngineBuilder {
    /// Pass the document store used to persist registers.
    pub fn store(mut self, store: impl DocumentStore + 'static) -> EngineBuilder {
        self.store = Some(Arc::new(store));
        self
    }

    /// Share an already allocated store.
    pub fn shared_store(mut self, store: Arc<dyn DocumentStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let store = self.store.ok_or(EngineError::MissingStore)?;
        Ok(Engine { store })
    }
}
