pub mod cache;
pub mod dns;
pub mod geo;
pub mod upstream;
