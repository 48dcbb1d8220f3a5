use async_trait::async_trait;
use dnstoys_domain::{DomainError, ExchangeRateTable};

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch a complete, fresh rate table from upstream.
    async fn fetch_rates(&self) -> Result<ExchangeRateTable, DomainError>;
}
