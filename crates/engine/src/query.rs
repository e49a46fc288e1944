//! In-memory filtering and aggregation over a snapshot of registers.
//!
//! Everything here is a pure function of its inputs: no state is kept
//! between calls and the snapshot is never modified.

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::Register;

/// Length of the rolling consumption window.
pub const CONSUMPTION_WINDOW_HOURS: i64 = 30 * 24;

/// Criteria for [`filter_registers`].
///
/// Empty `name`/`currency` match anything. Both date bounds are exclusive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterFilter {
    pub name: String,
    pub currency: String,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
}

impl RegisterFilter {
    /// Build a filter from raw query values.
    ///
    /// A date that is not valid RFC 3339 is dropped and the bound is left
    /// open. It is never reported as an error.
    pub fn from_query(
        name: Option<String>,
        currency: Option<String>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Self {
        Self {
            name: name.unwrap_or_default(),
            currency: currency.unwrap_or_default(),
            start: parse_bound("startDate", start),
            end: parse_bound("endDate", end),
        }
    }

    /// Whether `register` passes every criterion.
    pub fn matches(&self, register: &Register) -> bool {
        (self.name.is_empty() || register.name == self.name)
            && (self.currency.is_empty() || register.currency == self.currency)
            && self.start.is_none_or(|start| register.date > start)
            && self.end.is_none_or(|end| register.date < end)
    }
}

fn parse_bound(label: &str, value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let value = value?;
    if value.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::debug!("ignoring unparsable {label} {value:?}: {err}");
            None
        }
    }
}

/// Registers of `records` matching `filter`, in input order.
pub fn filter_registers(records: &[Register], filter: &RegisterFilter) -> Vec<Register> {
    records
        .iter()
        .filter(|register| filter.matches(register))
        .cloned()
        .collect()
}

/// Sum of the amounts registered by `name` in `currency` less than 30 days
/// before `now`.
///
/// Registers dated after `now` have a negative age and are counted.
pub fn sum_monthly_consumption(
    records: &[Register],
    name: &str,
    currency: &str,
    now: DateTime<Utc>,
) -> f64 {
    let window = Duration::hours(CONSUMPTION_WINDOW_HOURS);
    records
        .iter()
        .filter(|register| {
            register.name == name
                && register.currency == currency
                && now.signed_duration_since(register.date) < window
        })
        .fold(0.0, |total, register| total + register.amount)
}
