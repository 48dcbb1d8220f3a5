use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("Place not found: {0}")]
    PlaceNotFound(String),

    #[error("Zone not found (NXDOMAIN): {0}")]
    NxDomain(String),

    #[error("Upstream error from {source_name}: {message}")]
    Upstream {
        source_name: String,
        message: String,
    },

    #[error("Upstream timeout after {timeout_ms}ms from {source_name}")]
    UpstreamTimeout { source_name: String, timeout_ms: u64 },

    #[error("Exchange rates not loaded yet")]
    RatesUnavailable,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse error class, used to pick the protocol response for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Format,
    Resolution,
    Upstream,
    Internal,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidQuery(_) | DomainError::UnknownCurrency(_) => ErrorKind::Format,
            DomainError::PlaceNotFound(_) | DomainError::NxDomain(_) => ErrorKind::Resolution,
            DomainError::Upstream { .. }
            | DomainError::UpstreamTimeout { .. }
            | DomainError::RatesUnavailable => ErrorKind::Upstream,
            DomainError::Internal(_) => ErrorKind::Internal,
            DomainError::ConfigError(_) => ErrorKind::Config,
        }
    }

    pub fn upstream(source_name: &str, message: impl Into<String>) -> Self {
        DomainError::Upstream {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    /// Transient failures are answered with SERVFAIL so resolvers retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Upstream | ErrorKind::Internal | ErrorKind::Config
        )
    }
}
