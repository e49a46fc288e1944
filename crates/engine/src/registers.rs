//! Monetary entries logged by callers.
//!
//! A [`Register`] is persisted as a single JSON document in the
//! [`COLLECTION`] collection, keyed by the decimal form of its id.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding every register document.
pub const COLLECTION: &str = "registers";

/// A stored register.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Register {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub currency: String,
    pub date: DateTime<FixedOffset>,
    pub note: String,
}

/// A register not yet persisted. The id is assigned by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterNew {
    pub name: String,
    pub amount: f64,
    pub currency: String,
    pub date: DateTime<FixedOffset>,
    pub note: String,
}

impl Register {
    /// Build the stored form of `new`, deriving the id from `created_at`.
    ///
    /// Ids have one second granularity: two registers created within the
    /// same second get the same id.
    pub fn from_new(new: RegisterNew, created_at: DateTime<Utc>) -> Self {
        Self {
            id: created_at.timestamp(),
            name: new.name,
            amount: new.amount,
            currency: new.currency,
            date: new.date,
            note: new.note,
        }
    }

    /// Key of the document inside [`COLLECTION`].
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}
