use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// First value of `key` among decoded query pairs. Later repeats are ignored.
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find_map(|(k, v)| (k == key).then(|| v.clone()))
}

pub mod register {
    use super::*;

    /// Request body for `POST /addRegister`.
    ///
    /// Missing or `null` text fields decode as empty strings and a missing
    /// or `null` amount as zero. Any `id` sent by the client is ignored.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterNew {
        #[serde(default, deserialize_with = "null_as_default")]
        pub name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        pub amount: f64,
        #[serde(default, deserialize_with = "null_as_default")]
        pub currency: String,
        pub date: DateTime<FixedOffset>,
        #[serde(default, deserialize_with = "null_as_default")]
        pub note: String,
    }

    /// A stored register, as returned by the API.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Register {
        pub id: i64,
        pub name: String,
        pub amount: f64,
        pub currency: String,
        pub date: DateTime<FixedOffset>,
        pub note: String,
    }

    /// Query string of `GET /getRegister`.
    ///
    /// Dates are kept as raw strings: one that is not RFC 3339 is ignored by
    /// the server instead of rejected.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterQuery {
        pub name: Option<String>,
        pub currency: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    impl RegisterQuery {
        /// Build from decoded query pairs, keeping the first value per key.
        pub fn from_pairs(pairs: &[(String, String)]) -> Self {
            Self {
                name: first_value(pairs, "name"),
                currency: first_value(pairs, "currency"),
                start_date: first_value(pairs, "startDate"),
                end_date: first_value(pairs, "endDate"),
            }
        }
    }
}

pub mod consumption {
    use super::*;

    /// Query string of `GET /getMonthConsumption`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ConsumptionQuery {
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub currency: String,
    }

    impl ConsumptionQuery {
        /// Build from decoded query pairs, keeping the first value per key.
        pub fn from_pairs(pairs: &[(String, String)]) -> Self {
            Self {
                name: first_value(pairs, "name").unwrap_or_default(),
                currency: first_value(pairs, "currency").unwrap_or_default(),
            }
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthConsumption {
        pub total_consumption: f64,
    }
}
