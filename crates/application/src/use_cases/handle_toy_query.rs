use super::router::ZoneRouter;
use dnstoys_domain::{DomainError, RecordType, ToyAnswer, ToyQuery};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Entry point for one question: parse, route, run the handler.
///
/// Every failure comes back as a `DomainError`; the caller turns it into a
/// protocol response. Nothing here touches shared state on error.
pub struct HandleToyQueryUseCase {
    router: Arc<ZoneRouter>,
}

impl HandleToyQueryUseCase {
    pub fn new(router: Arc<ZoneRouter>) -> Self {
        Self { router }
    }

    pub async fn execute(
        &self,
        name: &str,
        record_type: RecordType,
        client_ip: IpAddr,
    ) -> Result<ToyAnswer, DomainError> {
        let start = Instant::now();
        let query = ToyQuery::parse(name, record_type, client_ip)?;

        let handler = self.router.route(&query);
        let result = handler.handle(&query).await;

        let elapsed_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(answer) => debug!(
                name = %query.name,
                zone = %query.zone,
                client = %client_ip,
                records = answer.records.len(),
                elapsed_us,
                "Query answered"
            ),
            Err(e) if e.is_transient() => warn!(
                name = %query.name,
                zone = %query.zone,
                client = %client_ip,
                error = %e,
                elapsed_us,
                "Query failed"
            ),
            Err(e) => debug!(
                name = %query.name,
                zone = %query.zone,
                error = %e,
                "Query rejected"
            ),
        }

        result
    }
}
