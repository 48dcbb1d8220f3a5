use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FxConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Seconds between rate table refreshes. Required when enabled.
    #[serde(default)]
    pub refresh_interval: Option<u64>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            refresh_interval: None,
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    10
}
