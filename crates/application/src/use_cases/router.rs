use super::help::HelpHandler;
use crate::ports::ToyHandler;
use async_trait::async_trait;
use dnstoys_domain::{DomainError, ServiceKind, ToyAnswer, ToyQuery, HELP_ZONE};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Answers every zone nobody registered: NXDOMAIN, no service logic.
pub struct DefaultHandler;

#[async_trait]
impl ToyHandler for DefaultHandler {
    async fn handle(&self, query: &ToyQuery) -> Result<ToyAnswer, DomainError> {
        Err(DomainError::NxDomain(query.name.to_string()))
    }
}

/// Explicit zone → handler table.
///
/// Zones are stored lower-cased without the root dot; `ToyQuery::parse`
/// normalizes the query side the same way.
pub struct ZoneRouter {
    handlers: FxHashMap<String, Arc<dyn ToyHandler>>,
    fallback: Arc<dyn ToyHandler>,
}

impl ZoneRouter {
    /// The help zone is always present.
    pub fn new(help: Arc<HelpHandler>) -> Self {
        let mut router = Self {
            handlers: FxHashMap::default(),
            fallback: Arc::new(DefaultHandler),
        };
        router.register(HELP_ZONE, help);
        router
    }

    pub fn register(&mut self, zone: &str, handler: Arc<dyn ToyHandler>) {
        let zone = zone.trim_end_matches('.').to_ascii_lowercase();
        self.handlers.insert(zone, handler);
    }

    pub fn register_service(&mut self, kind: ServiceKind, handler: Arc<dyn ToyHandler>) {
        self.register(kind.zone(), handler);
    }

    pub fn route(&self, query: &ToyQuery) -> Arc<dyn ToyHandler> {
        self.handlers
            .get(query.zone.as_ref())
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    pub fn is_routed(&self, zone: &str) -> bool {
        self.handlers
            .contains_key(zone.trim_end_matches('.').to_ascii_lowercase().as_str())
    }

    pub fn zones(&self) -> Vec<&str> {
        let mut zones: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        zones.sort_unstable();
        zones
    }
}
