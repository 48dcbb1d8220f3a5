use async_trait::async_trait;
use dnstoys_application::ports::RateSource;
use dnstoys_domain::{DomainError, ExchangeRateTable};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub struct MockRateSource {
    calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockRateSource {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for MockRateSource {
    async fn fetch_rates(&self) -> Result<ExchangeRateTable, DomainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::upstream("mock-rates", "HTTP 502"));
        }
        let rates = HashMap::from([
            ("USD".to_string(), 1.0),
            ("EUR".to_string(), 0.9 + call as f64 / 1000.0),
        ]);
        Ok(ExchangeRateTable::new("USD", rates))
    }
}
