use std::sync::Arc;

/// A named place from the geo dataset.
///
/// `(name, country_code)` is unique within a dataset; `name` alone is not.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub name: Arc<str>,
    pub aliases: Vec<Arc<str>>,
    pub country_code: Arc<str>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Arc<str>,
    /// Tie-break weight between same-named places (population).
    pub priority: u64,
}

impl GeoLocation {
    /// Stable identity used as a cache key, shared by every alias of the place.
    pub fn key(&self) -> String {
        format!(
            "{}/{}",
            self.name.to_lowercase(),
            self.country_code.to_ascii_lowercase()
        )
    }
}

/// How a name was matched against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoMatch {
    Exact,
    Fuzzy,
}
