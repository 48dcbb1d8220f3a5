mod clock;
mod geo_resolver;
mod rate_source;
mod toy_handler;
mod weather_provider;

pub use clock::{Clock, SystemClock};
pub use geo_resolver::{GeoResolution, GeoResolver};
pub use rate_source::RateSource;
pub use toy_handler::ToyHandler;
pub use weather_provider::{CachedReport, WeatherProvider, WeatherSource};

// Re-export for convenience
pub use dnstoys_domain::ToyQuery;
