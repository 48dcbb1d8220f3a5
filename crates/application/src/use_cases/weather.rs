use super::place::resolve_place;
use super::time::parse_timezone;
use crate::ports::{Clock, GeoResolver, ToyHandler, WeatherProvider};
use crate::services::PlaceQuery;
use async_trait::async_trait;
use chrono::Duration;
use dnstoys_domain::{AnswerData, DomainError, ToyAnswer, ToyQuery};
use std::sync::Arc;
use tracing::debug;

/// Hours between consecutive forecast points in an answer.
const FORECAST_STEP: usize = 2;

/// Answers `<place>.weather` through the (cache-backed) weather provider.
pub struct WeatherHandler {
    geo: Arc<dyn GeoResolver>,
    provider: Arc<dyn WeatherProvider>,
    clock: Arc<dyn Clock>,
    entries: usize,
}

impl WeatherHandler {
    pub fn new(
        geo: Arc<dyn GeoResolver>,
        provider: Arc<dyn WeatherProvider>,
        clock: Arc<dyn Clock>,
        entries: usize,
    ) -> Self {
        Self {
            geo,
            provider,
            clock,
            entries: entries.max(1),
        }
    }
}

#[async_trait]
impl ToyHandler for WeatherHandler {
    async fn handle(&self, query: &ToyQuery) -> Result<ToyAnswer, DomainError> {
        let place = PlaceQuery::parse(query)?;
        let resolved = resolve_place(self.geo.as_ref(), &place)?;
        let loc = resolved.location;

        let cached = self.provider.forecast(&loc).await?;
        let tz = parse_timezone(&loc.timezone)?;

        // Skip points more than an hour old; a cached report ages in place.
        let cutoff = self.clock.now() - Duration::hours(1);
        let header = format!("{} ({})", loc.name, loc.country_code);

        let records: Vec<AnswerData> = cached
            .report
            .forecast
            .iter()
            .filter(|p| p.time > cutoff)
            .step_by(FORECAST_STEP)
            .take(self.entries)
            .map(|p| {
                AnswerData::Txt(vec![
                    header.clone(),
                    format!("{:.2}C ({:.2}F)", p.temperature_c, p.temperature_f()),
                    format!("{:.2}% hu.", p.humidity_pct),
                    p.summary.clone(),
                    p.time.with_timezone(&tz).format("%H:%M, %a").to_string(),
                ])
            })
            .collect();

        if records.is_empty() {
            return Err(DomainError::upstream(
                "weather",
                format!("no current forecast points for {}", loc.key()),
            ));
        }

        debug!(
            place = %loc.key(),
            points = records.len(),
            ttl_secs = cached.remaining_ttl.as_secs(),
            "Weather answer"
        );

        let ttl = u32::try_from(cached.remaining_ttl.as_secs())
            .unwrap_or(u32::MAX)
            .max(1);
        Ok(ToyAnswer::new(records, ttl))
    }
}
