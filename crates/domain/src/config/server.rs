use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Public name of this server, used in help examples and as the
    /// weather User-Agent.
    #[serde(default)]
    pub domain: String,

    /// UDP listen address, e.g. `0.0.0.0:53`.
    #[serde(default)]
    pub address: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            address: None,
        }
    }
}
