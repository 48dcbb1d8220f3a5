#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dnstoys_application::ports::{
    CachedReport, Clock, GeoResolution, GeoResolver, RateSource, WeatherProvider,
};
use dnstoys_domain::{
    DomainError, ExchangeRateTable, GeoLocation, GeoMatch, RecordType, ToyQuery, WeatherReport,
};
use std::collections::{BTreeSet, HashMap};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9));

pub fn txt_query(name: &str) -> ToyQuery {
    ToyQuery::parse(name, RecordType::TXT, CLIENT_IP).unwrap()
}

pub fn location(name: &str, country: &str, tz: &str, priority: u64) -> GeoLocation {
    GeoLocation {
        name: Arc::from(name),
        aliases: vec![],
        country_code: Arc::from(country),
        latitude: 0.0,
        longitude: 0.0,
        timezone: Arc::from(tz),
        priority,
    }
}

/// Exact-match-only resolver; enough for handler tests.
pub struct MockGeoResolver {
    locations: Vec<Arc<GeoLocation>>,
    calls: AtomicUsize,
}

impl MockGeoResolver {
    pub fn new(locations: Vec<GeoLocation>) -> Self {
        Self {
            locations: locations.into_iter().map(Arc::new).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeoResolver for MockGeoResolver {
    fn resolve(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> Result<GeoResolution, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut matches: Vec<&Arc<GeoLocation>> = self
            .locations
            .iter()
            .filter(|l| {
                l.name.eq_ignore_ascii_case(name)
                    || l.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
            })
            .collect();
        matches.sort_by_key(|l| {
            let hinted = country_hint.is_some_and(|h| l.country_code.eq_ignore_ascii_case(h));
            (!hinted, std::cmp::Reverse(l.priority))
        });
        matches
            .first()
            .map(|l| GeoResolution {
                location: Arc::clone(l),
                matched: GeoMatch::Exact,
            })
            .ok_or_else(|| DomainError::PlaceNotFound(name.to_string()))
    }

    fn country_timezones(&self, country_code: &str) -> Vec<Arc<str>> {
        let zones: BTreeSet<Arc<str>> = self
            .locations
            .iter()
            .filter(|l| l.country_code.eq_ignore_ascii_case(country_code))
            .map(|l| Arc::clone(&l.timezone))
            .collect();
        zones.into_iter().collect()
    }

    fn count(&self) -> usize {
        self.locations.len()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct MockWeatherProvider {
    reports: Mutex<HashMap<String, WeatherReport>>,
    remaining_ttl: Duration,
    should_fail: Mutex<bool>,
    requested: Mutex<Vec<String>>,
}

impl MockWeatherProvider {
    pub fn new(remaining_ttl: Duration) -> Self {
        Self {
            reports: Mutex::new(HashMap::new()),
            remaining_ttl,
            should_fail: Mutex::new(false),
            requested: Mutex::new(vec![]),
        }
    }

    pub fn set_report(&self, report: WeatherReport) {
        self.reports
            .lock()
            .unwrap()
            .insert(report.place_key.clone(), report);
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }

    pub fn requested_keys(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn forecast(&self, place: &GeoLocation) -> Result<CachedReport, DomainError> {
        self.requested.lock().unwrap().push(place.key());
        if *self.should_fail.lock().unwrap() {
            return Err(DomainError::upstream("mock-weather", "unavailable"));
        }
        self.reports
            .lock()
            .unwrap()
            .get(&place.key())
            .cloned()
            .map(|report| CachedReport {
                report: Arc::new(report),
                remaining_ttl: self.remaining_ttl,
            })
            .ok_or_else(|| DomainError::upstream("mock-weather", "no report"))
    }
}

pub struct MockRateSource {
    next: Mutex<Result<ExchangeRateTable, DomainError>>,
    calls: AtomicUsize,
}

impl MockRateSource {
    pub fn new(result: Result<ExchangeRateTable, DomainError>) -> Self {
        Self {
            next: Mutex::new(result),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_result(&self, result: Result<ExchangeRateTable, DomainError>) {
        *self.next.lock().unwrap() = result;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for MockRateSource {
    async fn fetch_rates(&self) -> Result<ExchangeRateTable, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.next.lock().unwrap().clone()
    }
}

pub fn rates(pairs: &[(&str, f64)]) -> ExchangeRateTable {
    ExchangeRateTable::new(
        "USD",
        pairs
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect(),
    )
}
