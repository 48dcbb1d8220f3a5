//! GeoNames `cities*.txt` reader.
//!
//! Tab-separated, one place per line. The columns used are name (1),
//! ASCII name (2), alternate names (3), latitude (4), longitude (5),
//! country code (8), population (14) and timezone (17).

use dnstoys_domain::{DomainError, GeoLocation};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const COL_NAME: usize = 1;
const COL_ASCII_NAME: usize = 2;
const COL_ALTERNATE_NAMES: usize = 3;
const COL_LATITUDE: usize = 4;
const COL_LONGITUDE: usize = 5;
const COL_COUNTRY: usize = 8;
const COL_POPULATION: usize = 14;
const COL_TIMEZONE: usize = 17;
const MIN_COLUMNS: usize = COL_TIMEZONE + 1;

pub fn load_geo_file(path: &Path) -> Result<Vec<GeoLocation>, DomainError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DomainError::ConfigError(format!(
            "cannot read geo dataset {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut locations = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_geo_line(line) {
            Some(loc) => locations.push(loc),
            None => {
                skipped += 1;
                debug!(line = line_no + 1, "Skipping malformed geo line");
            }
        }
    }

    if locations.is_empty() {
        return Err(DomainError::ConfigError(format!(
            "geo dataset {} has no usable entries",
            path.display()
        )));
    }

    info!(
        path = %path.display(),
        locations = locations.len(),
        skipped,
        "Geo dataset loaded"
    );

    Ok(locations)
}

pub fn parse_geo_line(line: &str) -> Option<GeoLocation> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < MIN_COLUMNS {
        return None;
    }

    let name = cols[COL_NAME].trim();
    let country = cols[COL_COUNTRY].trim();
    let timezone = cols[COL_TIMEZONE].trim();
    if name.is_empty() || country.len() != 2 || timezone.is_empty() {
        return None;
    }

    let latitude: f64 = cols[COL_LATITUDE].trim().parse().ok()?;
    let longitude: f64 = cols[COL_LONGITUDE].trim().parse().ok()?;
    let priority: u64 = cols[COL_POPULATION].trim().parse().unwrap_or(0);

    let mut aliases: Vec<Arc<str>> = Vec::new();
    let candidates = std::iter::once(cols[COL_ASCII_NAME])
        .chain(cols[COL_ALTERNATE_NAMES].split(','));
    for alias in candidates {
        let alias = alias.trim();
        if alias.is_empty()
            || alias.to_lowercase() == name.to_lowercase()
            || aliases.iter().any(|a| a.to_lowercase() == alias.to_lowercase())
        {
            continue;
        }
        aliases.push(Arc::from(alias));
    }

    Some(GeoLocation {
        name: Arc::from(name),
        aliases,
        country_code: Arc::from(country.to_ascii_uppercase()),
        latitude,
        longitude,
        timezone: Arc::from(timezone),
        priority,
    })
}
