use std::fmt;
use std::str::FromStr;

/// The closed set of toy services a server can expose.
///
/// Each member owns one top-level zone. `help` is not a member: it is always
/// served and lists whichever members are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    Time,
    Fx,
    MyIp,
    Weather,
}

pub const HELP_ZONE: &str = "help";

impl ServiceKind {
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Time,
        ServiceKind::Fx,
        ServiceKind::MyIp,
        ServiceKind::Weather,
    ];

    pub fn zone(&self) -> &'static str {
        match self {
            ServiceKind::Time => "time",
            ServiceKind::Fx => "fx",
            ServiceKind::MyIp => "myip",
            ServiceKind::Weather => "weather",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ServiceKind::Time => "get time for a city or country code",
            ServiceKind::Fx => "convert currency rates (25USD-EUR.fx, 99.5JPY-INR.fx)",
            ServiceKind::MyIp => "get your host's requesting IP.",
            ServiceKind::Weather => "get weather forecast for a city.",
        }
    }

    /// Example question name, without the trailing server part.
    pub fn example(&self) -> &'static str {
        match self {
            ServiceKind::Time => "mumbai.time",
            ServiceKind::Fx => "25USD-EUR.fx",
            ServiceKind::MyIp => "myip",
            ServiceKind::Weather => "berlin.weather",
        }
    }

    /// Whether the service resolves place names through the geo index.
    pub fn needs_geo(&self) -> bool {
        matches!(self, ServiceKind::Time | ServiceKind::Weather)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.zone())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let zone = s.trim_end_matches('.');
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.zone().eq_ignore_ascii_case(zone))
            .ok_or_else(|| format!("unknown service zone: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_round_trip_is_case_insensitive() {
        assert_eq!("TIME".parse::<ServiceKind>(), Ok(ServiceKind::Time));
        assert_eq!("weather.".parse::<ServiceKind>(), Ok(ServiceKind::Weather));
        assert!("help".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn test_geo_dependent_services() {
        let geo: Vec<_> = ServiceKind::ALL.iter().filter(|k| k.needs_geo()).collect();
        assert_eq!(geo, vec![&ServiceKind::Time, &ServiceKind::Weather]);
    }
}
