pub mod fx;
pub mod handle_toy_query;
pub mod help;
pub mod myip;
mod place;
pub mod refresh_rates;
pub mod router;
pub mod time;
pub mod weather;

pub use fx::{FxConversion, FxHandler};
pub use handle_toy_query::HandleToyQueryUseCase;
pub use help::HelpHandler;
pub use myip::MyIpHandler;
pub use refresh_rates::RefreshRatesUseCase;
pub use router::{DefaultHandler, ZoneRouter};
pub use time::{LocalTime, TimeHandler};
pub use weather::WeatherHandler;
