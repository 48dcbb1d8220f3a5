pub mod query_parser;
pub mod rate_table_store;

pub use query_parser::{FxQuery, PlaceHint, PlaceQuery};
pub use rate_table_store::RateTableStore;
