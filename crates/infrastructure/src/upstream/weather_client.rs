use super::http::{build_client, fetch_json};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dnstoys_application::ports::WeatherSource;
use dnstoys_domain::{DomainError, ForecastPoint, GeoLocation, WeatherReport};
use serde::Deserialize;
use std::time::Duration;

pub const MET_NORWAY_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0/compact";
const SOURCE_NAME: &str = "met.no";

// ── locationforecast/2.0/compact ──────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompactForecast {
    pub properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub timeseries: Vec<TimeStep>,
}

#[derive(Debug, Deserialize)]
pub struct TimeStep {
    pub time: DateTime<Utc>,
    pub data: StepData,
}

#[derive(Debug, Deserialize)]
pub struct StepData {
    pub instant: InstantData,
    #[serde(default)]
    pub next_1_hours: Option<PeriodData>,
    #[serde(default)]
    pub next_6_hours: Option<PeriodData>,
}

#[derive(Debug, Deserialize)]
pub struct InstantData {
    pub details: InstantDetails,
}

#[derive(Debug, Deserialize)]
pub struct InstantDetails {
    pub air_temperature: Option<f64>,
    pub relative_humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodData {
    pub summary: PeriodSummary,
}

#[derive(Debug, Deserialize)]
pub struct PeriodSummary {
    pub symbol_code: String,
}

impl CompactForecast {
    /// Steps without a temperature are dropped. The symbol comes from the
    /// next hour, falling back to the six-hour block further out.
    pub fn into_report(self, place_key: String, fetched_at: DateTime<Utc>) -> WeatherReport {
        let forecast = self
            .properties
            .timeseries
            .into_iter()
            .filter_map(|step| {
                let details = &step.data.instant.details;
                let temperature_c = details.air_temperature?;
                let summary = step
                    .data
                    .next_1_hours
                    .as_ref()
                    .or(step.data.next_6_hours.as_ref())
                    .map(|p| p.summary.symbol_code.clone())
                    .unwrap_or_default();
                Some(ForecastPoint {
                    time: step.time,
                    temperature_c,
                    humidity_pct: details.relative_humidity.unwrap_or(0.0),
                    summary,
                })
            })
            .collect();

        WeatherReport {
            place_key,
            forecast,
            fetched_at,
        }
    }
}

/// MET Norway client. Their terms require an identifying User-Agent, which
/// is the server's own domain.
pub struct MetNorwayClient {
    client: reqwest::Client,
}

impl MetNorwayClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
        })
    }
}

#[async_trait]
impl WeatherSource for MetNorwayClient {
    async fn fetch(&self, place: &GeoLocation) -> Result<WeatherReport, DomainError> {
        // met.no rejects coordinates with more than four decimals.
        let lat = format!("{:.4}", place.latitude);
        let lon = format!("{:.4}", place.longitude);

        let forecast: CompactForecast = fetch_json(
            &self.client,
            SOURCE_NAME,
            MET_NORWAY_URL,
            &[("lat", lat.as_str()), ("lon", lon.as_str())],
        )
        .await?;

        let report = forecast.into_report(place.key(), Utc::now());
        if report.forecast.is_empty() {
            return Err(DomainError::upstream(
                SOURCE_NAME,
                format!("empty forecast for {}", place.key()),
            ));
        }
        Ok(report)
    }
}
