use super::errors::DomainError;
use smallvec::SmallVec;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// Question types the services care about. Anything else is carried through
/// as `Other` and answered like a TXT question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    TXT,
    ANY,
    Other(u16),
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => f.write_str("A"),
            RecordType::AAAA => f.write_str("AAAA"),
            RecordType::TXT => f.write_str("TXT"),
            RecordType::ANY => f.write_str("ANY"),
            RecordType::Other(code) => write!(f, "TYPE{}", code),
        }
    }
}

/// A decoded question, split into its routing zone and parameter labels.
#[derive(Debug, Clone)]
pub struct ToyQuery {
    pub name: Arc<str>,
    pub zone: Arc<str>,
    pub labels: SmallVec<[Arc<str>; 2]>,
    pub record_type: RecordType,
    pub client_ip: IpAddr,
}

impl ToyQuery {
    /// Splits `name` into the top-level zone label (lower-cased) and the
    /// labels preceding it. The trailing root dot is optional.
    pub fn parse(
        name: &str,
        record_type: RecordType,
        client_ip: IpAddr,
    ) -> Result<Self, DomainError> {
        let trimmed = name.trim_end_matches('.');
        if trimmed.is_empty() {
            return Err(DomainError::InvalidQuery("empty question name".to_string()));
        }

        let mut parts: SmallVec<[&str; 4]> = trimmed.split('.').collect();
        if parts.iter().any(|label| label.is_empty()) {
            return Err(DomainError::InvalidQuery(format!(
                "empty label in {}",
                name
            )));
        }

        // split() always yields at least one element for a non-empty string
        let zone = parts.pop().unwrap_or_default().to_ascii_lowercase();
        let labels = parts.into_iter().map(Arc::from).collect();

        Ok(Self {
            name: Arc::from(trimmed),
            zone: Arc::from(zone),
            labels,
            record_type,
            client_ip,
        })
    }

    /// The single parameter label, for grammars that take exactly one.
    pub fn single_label(&self) -> Result<&str, DomainError> {
        match self.labels.as_slice() {
            [label] => Ok(label),
            [] => Err(DomainError::InvalidQuery(format!(
                "{} expects one label before .{}",
                self.name, self.zone
            ))),
            _ => Err(DomainError::InvalidQuery(format!(
                "{} has too many labels for .{}",
                self.name, self.zone
            ))),
        }
    }
}
