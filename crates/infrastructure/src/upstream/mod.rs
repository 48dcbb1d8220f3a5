pub mod cached_weather;
pub mod fx_client;
pub mod http;
pub mod weather_client;

pub use cached_weather::CachedWeatherProvider;
pub use fx_client::OpenExchangeRatesClient;
pub use weather_client::MetNorwayClient;
