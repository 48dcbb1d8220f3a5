use arc_swap::ArcSwapOption;
use dnstoys_domain::ExchangeRateTable;
use std::sync::Arc;

/// Holds the current exchange rate snapshot.
///
/// Readers get an `Arc` to a whole table; a refresh swaps the pointer, so no
/// reader ever sees a half-written table.
#[derive(Default)]
pub struct RateTableStore {
    current: ArcSwapOption<ExchangeRateTable>,
}

impl RateTableStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    pub fn with_table(table: ExchangeRateTable) -> Self {
        Self {
            current: ArcSwapOption::from_pointee(table),
        }
    }

    pub fn snapshot(&self) -> Option<Arc<ExchangeRateTable>> {
        self.current.load_full()
    }

    pub fn replace(&self, table: ExchangeRateTable) {
        self.current.store(Some(Arc::new(table)));
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }
}
