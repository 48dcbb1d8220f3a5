use chrono::{DateTime, Utc};

/// One forecast point from the weather source.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub summary: String,
}

impl ForecastPoint {
    pub fn temperature_f(&self) -> f64 {
        self.temperature_c * 9.0 / 5.0 + 32.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Identity of the place the report belongs to (see `GeoLocation::key`).
    pub place_key: String,
    pub forecast: Vec<ForecastPoint>,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fahrenheit_conversion() {
        let point = ForecastPoint {
            time: Utc::now(),
            temperature_c: 100.0,
            humidity_pct: 40.0,
            summary: "clearsky_day".into(),
        };
        assert!((point.temperature_f() - 212.0).abs() < f64::EPSILON);
    }
}
