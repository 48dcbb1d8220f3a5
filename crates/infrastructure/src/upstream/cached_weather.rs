use crate::cache::UpstreamCache;
use async_trait::async_trait;
use dnstoys_application::ports::{CachedReport, WeatherProvider, WeatherSource};
use dnstoys_domain::{DomainError, GeoLocation, WeatherReport};
use std::sync::Arc;
use std::time::Duration;

/// Weather source behind an `UpstreamCache` keyed by `GeoLocation::key`, so
/// every alias of a place shares one entry and one in-flight fetch.
pub struct CachedWeatherProvider {
    source: Arc<dyn WeatherSource>,
    cache: UpstreamCache<String, WeatherReport>,
    fetch_timeout: Duration,
}

impl CachedWeatherProvider {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        max_entries: usize,
        ttl: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            cache: UpstreamCache::new("weather", max_entries, ttl),
            fetch_timeout,
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl WeatherProvider for CachedWeatherProvider {
    async fn forecast(&self, place: &GeoLocation) -> Result<CachedReport, DomainError> {
        let hit = self
            .cache
            .get(place.key(), self.fetch_timeout, || self.source.fetch(place))
            .await?;

        Ok(CachedReport {
            report: hit.value,
            remaining_ttl: hit.remaining_ttl,
        })
    }
}
