use async_trait::async_trait;
use dnstoys_domain::{DomainError, GeoLocation, WeatherReport};
use std::sync::Arc;
use std::time::Duration;

/// A report together with how long it stays valid in the cache.
#[derive(Debug, Clone)]
pub struct CachedReport {
    pub report: Arc<WeatherReport>,
    pub remaining_ttl: Duration,
}

/// Raw upstream forecast fetch, one call per invocation.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self, place: &GeoLocation) -> Result<WeatherReport, DomainError>;
}

/// Forecast lookup as seen by the weather handler, usually cache-backed.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn forecast(&self, place: &GeoLocation) -> Result<CachedReport, DomainError>;
}
