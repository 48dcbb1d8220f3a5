use dnstoys_domain::{DomainError, GeoLocation, GeoMatch};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GeoResolution {
    pub location: Arc<GeoLocation>,
    pub matched: GeoMatch,
}

/// Read-only place name index. Implementations are immutable after
/// construction, so lookups need no synchronization.
pub trait GeoResolver: Send + Sync {
    /// Resolve a place name, preferring `country_hint` among equally good
    /// matches. Fails with `DomainError::PlaceNotFound`.
    fn resolve(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> Result<GeoResolution, DomainError>;

    /// Distinct timezones of all places in a country, sorted.
    fn country_timezones(&self, country_code: &str) -> Vec<Arc<str>>;

    fn count(&self) -> usize;
}
