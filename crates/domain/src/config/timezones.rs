use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimezonesConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Geo dataset, also required when only the weather service is enabled.
    #[serde(default)]
    pub geo_filepath: Option<String>,
}
