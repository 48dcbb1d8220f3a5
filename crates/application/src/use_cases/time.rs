use super::place::resolve_place;
use crate::ports::{Clock, GeoResolver, ToyHandler};
use crate::services::PlaceQuery;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use chrono_tz::Tz;
use dnstoys_domain::toy_answer::TIME_TTL;
use dnstoys_domain::{AnswerData, DomainError, ToyAnswer, ToyQuery};
use std::sync::Arc;
use tracing::debug;

/// Local time for one place or timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTime {
    pub label: String,
    pub local: DateTime<FixedOffset>,
}

/// Answers `<place>.time` and `<country code>.time`.
pub struct TimeHandler {
    geo: Arc<dyn GeoResolver>,
    clock: Arc<dyn Clock>,
}

impl TimeHandler {
    pub fn new(geo: Arc<dyn GeoResolver>, clock: Arc<dyn Clock>) -> Self {
        Self { geo, clock }
    }

    /// A bare two-letter label that is a known country lists all of its
    /// timezones; anything else goes through place resolution.
    pub fn lookup(&self, place: &PlaceQuery) -> Result<Vec<LocalTime>, DomainError> {
        let now = self.clock.now();

        if let Some(code) = place.as_country_code() {
            let zones = self.geo.country_timezones(&code);
            if !zones.is_empty() {
                debug!(country = %code, zones = zones.len(), "Country time lookup");
                return zones
                    .iter()
                    .map(|tz| {
                        Ok(LocalTime {
                            label: format!("{} ({})", code, tz),
                            local: in_timezone(now, tz)?,
                        })
                    })
                    .collect();
            }
        }

        let resolved = resolve_place(self.geo.as_ref(), place)?;
        let loc = &resolved.location;
        Ok(vec![LocalTime {
            label: format!("{} ({}, {})", loc.name, loc.timezone, loc.country_code),
            local: in_timezone(now, &loc.timezone)?,
        }])
    }
}

#[async_trait]
impl ToyHandler for TimeHandler {
    async fn handle(&self, query: &ToyQuery) -> Result<ToyAnswer, DomainError> {
        let place = PlaceQuery::parse(query)?;
        let times = self.lookup(&place)?;

        let records = times
            .into_iter()
            .map(|t| AnswerData::Txt(vec![t.label, t.local.to_rfc2822()]))
            .collect();

        Ok(ToyAnswer::new(records, TIME_TTL))
    }
}

pub(crate) fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::Internal(format!("unknown timezone in geo data: {}", name)))
}

fn in_timezone(now: DateTime<Utc>, name: &str) -> Result<DateTime<FixedOffset>, DomainError> {
    let tz = parse_timezone(name)?;
    let local = now.with_timezone(&tz);
    Ok(local.with_timezone(&local.offset().fix()))
}
