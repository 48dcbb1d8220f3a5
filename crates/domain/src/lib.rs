//! dnstoys Domain Layer
pub mod config;
pub mod errors;
pub mod exchange_rate;
pub mod geo_location;
pub mod help_entry;
pub mod service;
pub mod toy_answer;
pub mod toy_query;
pub mod weather_report;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::{DomainError, ErrorKind};
pub use exchange_rate::ExchangeRateTable;
pub use geo_location::{GeoLocation, GeoMatch};
pub use help_entry::HelpEntry;
pub use service::{ServiceKind, HELP_ZONE};
pub use toy_answer::{AnswerData, ToyAnswer};
pub use toy_query::{RecordType, ToyQuery};
pub use weather_report::{ForecastPoint, WeatherReport};
