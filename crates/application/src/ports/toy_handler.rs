use async_trait::async_trait;
use dnstoys_domain::{DomainError, ToyAnswer, ToyQuery};

#[async_trait]
pub trait ToyHandler: Send + Sync {
    async fn handle(&self, query: &ToyQuery) -> Result<ToyAnswer, DomainError>;
}
