use crate::ports::RateSource;
use crate::services::RateTableStore;
use dnstoys_domain::DomainError;
use std::sync::Arc;
use tracing::{info, warn};

/// One refresh of the exchange rate snapshot.
///
/// A failed fetch leaves the previous snapshot in place; stale rates are
/// served until the next successful refresh.
pub struct RefreshRatesUseCase {
    source: Arc<dyn RateSource>,
    store: Arc<RateTableStore>,
}

impl RefreshRatesUseCase {
    pub fn new(source: Arc<dyn RateSource>, store: Arc<RateTableStore>) -> Self {
        Self { source, store }
    }

    /// Returns the number of currencies in the new table.
    pub async fn execute(&self) -> Result<usize, DomainError> {
        match self.source.fetch_rates().await {
            Ok(table) if table.is_empty() => {
                warn!("Rate source returned an empty table; keeping previous snapshot");
                Err(DomainError::upstream("rates", "empty rate table"))
            }
            Ok(table) => {
                let count = table.len();
                info!(currencies = count, base = %table.base, "Exchange rates refreshed");
                self.store.replace(table);
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, stale = self.store.is_loaded(), "Exchange rate refresh failed");
                Err(e)
            }
        }
    }
}
