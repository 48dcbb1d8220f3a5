use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A complete snapshot of exchange rates relative to `base`.
///
/// Snapshots are never edited in place; a refresh builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateTable {
    pub base: String,
    pub rates: HashMap<String, f64>,
    pub refreshed_at: DateTime<Utc>,
}

impl ExchangeRateTable {
    pub fn new(base: impl Into<String>, rates: HashMap<String, f64>) -> Self {
        Self {
            base: base.into(),
            rates,
            refreshed_at: Utc::now(),
        }
    }

    pub fn with_refreshed_at(mut self, refreshed_at: DateTime<Utc>) -> Self {
        self.refreshed_at = refreshed_at;
        self
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
