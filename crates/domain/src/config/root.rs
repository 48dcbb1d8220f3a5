use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::fx::FxConfig;
use super::logging::LoggingConfig;
use super::myip::MyIpConfig;
use super::server::ServerConfig;
use super::timezones::TimezonesConfig;
use super::weather::WeatherConfig;
use crate::service::ServiceKind;

/// Main configuration structure for dnstoys
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub timezones: TimezonesConfig,

    #[serde(default)]
    pub fx: FxConfig,

    #[serde(default)]
    pub myip: MyIpConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnstoys.toml in current directory
    /// 3. /etc/dnstoys/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("dnstoys.toml").exists() {
            Self::from_file("dnstoys.toml")?
        } else if std::path::Path::new("/etc/dnstoys/config.toml").exists() {
            Self::from_file("/etc/dnstoys/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(address) = overrides.address {
            self.server.address = Some(address);
        }
        if let Some(domain) = overrides.domain {
            self.server.domain = domain;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Enabled services, in a stable order.
    pub fn enabled_services(&self) -> Vec<ServiceKind> {
        ServiceKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }

    pub fn is_enabled(&self, kind: ServiceKind) -> bool {
        match kind {
            ServiceKind::Time => self.timezones.enabled,
            ServiceKind::Fx => self.fx.enabled,
            ServiceKind::MyIp => self.myip.enabled,
            ServiceKind::Weather => self.weather.enabled,
        }
    }

    /// The geo dataset is needed by any enabled place-based service.
    pub fn needs_geo(&self) -> bool {
        self.enabled_services().iter().any(ServiceKind::needs_geo)
    }

    /// Validate that every enabled service has what it needs to start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.domain.trim().is_empty() {
            return Err(ConfigError::MissingKey("server.domain"));
        }

        if is_blank(&self.server.address) {
            return Err(ConfigError::MissingKey("server.address"));
        }

        if self.needs_geo() && is_blank(&self.timezones.geo_filepath) {
            return Err(ConfigError::MissingKey("timezones.geo_filepath"));
        }

        if self.fx.enabled {
            if is_blank(&self.fx.api_key) {
                return Err(ConfigError::MissingKey("fx.api_key"));
            }
            if required(self.fx.refresh_interval, "fx.refresh_interval")? == 0 {
                return Err(ConfigError::Validation(
                    "fx.refresh_interval must be greater than 0".to_string(),
                ));
            }
            if self.fx.request_timeout == 0 {
                return Err(ConfigError::Validation(
                    "fx.request_timeout must be greater than 0".to_string(),
                ));
            }
        }

        if self.weather.enabled {
            if required(self.weather.max_entries, "weather.max_entries")? == 0 {
                return Err(ConfigError::Validation(
                    "weather.max_entries must be greater than 0".to_string(),
                ));
            }
            if required(self.weather.cache_ttl, "weather.cache_ttl")? == 0 {
                return Err(ConfigError::Validation(
                    "weather.cache_ttl must be greater than 0".to_string(),
                ));
            }
            if self.weather.request_timeout == 0 {
                return Err(ConfigError::Validation(
                    "weather.request_timeout must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Unwraps a key that has no default, naming it when absent.
pub fn required<T: Copy>(value: Option<T>, key: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::MissingKey(key))
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub address: Option<String>,
    pub domain: Option<String>,
    pub log_level: Option<String>,
}
