use super::http::{build_client, fetch_json};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dnstoys_application::ports::RateSource;
use dnstoys_domain::{DomainError, ExchangeRateTable};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const OPEN_EXCHANGE_RATES_URL: &str = "https://openexchangerates.org/api/latest.json";
const SOURCE_NAME: &str = "openexchangerates";

/// `latest.json` payload; only the fields the rate table needs.
#[derive(Debug, Deserialize)]
pub struct LatestRates {
    pub base: String,
    pub rates: HashMap<String, f64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl LatestRates {
    pub fn into_table(self) -> Result<ExchangeRateTable, DomainError> {
        let rates: HashMap<String, f64> = self
            .rates
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .map(|(code, rate)| (code.to_ascii_uppercase(), rate))
            .collect();

        if rates.is_empty() {
            return Err(DomainError::upstream(SOURCE_NAME, "response carried no rates"));
        }

        let table = ExchangeRateTable::new(self.base.to_ascii_uppercase(), rates);
        let published = self
            .timestamp
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));
        Ok(match published {
            Some(at) => table.with_refreshed_at(at),
            None => table,
        })
    }
}

pub struct OpenExchangeRatesClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenExchangeRatesClient {
    pub fn new(
        api_key: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            endpoint: OPEN_EXCHANGE_RATES_URL.to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl RateSource for OpenExchangeRatesClient {
    async fn fetch_rates(&self) -> Result<ExchangeRateTable, DomainError> {
        let latest: LatestRates = fetch_json(
            &self.client,
            SOURCE_NAME,
            &self.endpoint,
            &[("app_id", self.api_key.as_str())],
        )
        .await?;
        latest.into_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_table_normalizes_codes_and_timestamp() {
        let body = r#"{
            "disclaimer": "ignored",
            "timestamp": 1710460800,
            "base": "USD",
            "rates": {"eur": 0.9, "INR": 83.0, "BAD": 0.0}
        }"#;
        let latest: LatestRates = serde_json::from_str(body).unwrap();
        let table = latest.into_table().unwrap();

        assert_eq!(table.base, "USD");
        assert_eq!(table.rate("EUR"), Some(0.9));
        assert_eq!(table.rate("BAD"), None);
        assert_eq!(table.refreshed_at.timestamp(), 1_710_460_800);
    }

    #[test]
    fn test_empty_rates_are_an_upstream_error() {
        let latest: LatestRates =
            serde_json::from_str(r#"{"base": "USD", "rates": {}}"#).unwrap();
        assert!(latest.into_table().unwrap_err().is_transient());
    }
}
