use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Cache capacity. Required when enabled.
    #[serde(default)]
    pub max_entries: Option<usize>,

    /// Seconds a fetched forecast stays cached. Required when enabled.
    #[serde(default)]
    pub cache_ttl: Option<u64>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Forecast points returned per query.
    #[serde(default = "default_forecast_entries")]
    pub forecast_entries: usize,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_entries: None,
            cache_ttl: None,
            request_timeout: default_request_timeout(),
            forecast_entries: default_forecast_entries(),
        }
    }
}

fn default_request_timeout() -> u64 {
    3
}

fn default_forecast_entries() -> usize {
    5
}
