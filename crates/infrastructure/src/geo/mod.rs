pub mod fuzzy;
pub mod index;
pub mod loader;

pub use index::GeoIndex;
pub use loader::{load_geo_file, parse_geo_line};
