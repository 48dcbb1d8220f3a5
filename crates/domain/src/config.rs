pub mod errors;
pub mod fx;
pub mod logging;
pub mod myip;
pub mod root;
pub mod server;
pub mod timezones;
pub mod weather;

pub use errors::ConfigError;
pub use fx::FxConfig;
pub use logging::LoggingConfig;
pub use myip::MyIpConfig;
pub use root::{required, CliOverrides, Config};
pub use server::ServerConfig;
pub use timezones::TimezonesConfig;
pub use weather::WeatherConfig;
