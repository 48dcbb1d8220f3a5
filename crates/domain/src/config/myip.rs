use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MyIpConfig {
    #[serde(default)]
    pub enabled: bool,
}
