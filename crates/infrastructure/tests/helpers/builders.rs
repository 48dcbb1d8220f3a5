use async_trait::async_trait;
use chrono::Utc;
use dnstoys_application::ports::WeatherSource;
use dnstoys_domain::{DomainError, ForecastPoint, GeoLocation, WeatherReport};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn place(name: &str, aliases: &[&str], country: &str, tz: &str, priority: u64) -> GeoLocation {
    GeoLocation {
        name: Arc::from(name),
        aliases: aliases.iter().map(|a| Arc::from(*a)).collect(),
        country_code: Arc::from(country),
        latitude: 10.0,
        longitude: 20.0,
        timezone: Arc::from(tz),
        priority,
    }
}

pub fn build_query(id: u16, name: &str, record_type: RecordType) -> Message {
    let mut query = Query::new();
    query.set_name(Name::from_str(name).unwrap());
    query.set_query_type(record_type);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);
    message
}

pub fn encode(message: &Message) -> Vec<u8> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).unwrap();
    buf
}

/// Appends an EDNS0 OPT record advertising `udp_size` to an encoded query.
pub fn with_edns(mut packet: Vec<u8>, udp_size: u16) -> Vec<u8> {
    let arcount = u16::from_be_bytes([packet[10], packet[11]]) + 1;
    packet[10..12].copy_from_slice(&arcount.to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x00, 0x29]);
    packet.extend_from_slice(&udp_size.to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    packet
}

/// Weather source with a configurable delay and outcome, counting calls.
pub struct MockWeatherSource {
    delay: Duration,
    fail: Mutex<bool>,
    calls: AtomicUsize,
}

impl MockWeatherSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail: Mutex::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for MockWeatherSource {
    async fn fetch(&self, place: &GeoLocation) -> Result<WeatherReport, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if *self.fail.lock().unwrap() {
            return Err(DomainError::upstream("mock-weather", "HTTP 503"));
        }
        Ok(WeatherReport {
            place_key: place.key(),
            forecast: vec![ForecastPoint {
                time: Utc::now(),
                temperature_c: 21.0,
                humidity_pct: 40.0,
                summary: "clearsky_day".to_string(),
            }],
            fetched_at: Utc::now(),
        })
    }
}
