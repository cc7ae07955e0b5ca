//! Error types for the dashboard.

use thiserror::Error;
use vitals_client::VitalsError;

use crate::domains::Domain;

/// Why one tier of a domain could not contribute. Always absorbed by the
/// aggregator; callers only see it in logs.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{domain} provider unavailable: {source}")]
    ProviderUnavailable {
        domain: Domain,
        #[source]
        source: VitalsError,
    },

    #[error("{domain} fallback unavailable: {reason}")]
    FallbackUnavailable { domain: Domain, reason: String },
}

impl SourceError {
    pub fn provider(domain: Domain, source: VitalsError) -> Self {
        SourceError::ProviderUnavailable { domain, source }
    }

    pub fn fallback(domain: Domain, reason: impl ToString) -> Self {
        SourceError::FallbackUnavailable {
            domain,
            reason: reason.to_string(),
        }
    }
}

/// Dashboard errors.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no signed-in user")]
    MissingUser,

    #[error("aggregation cancelled or superseded")]
    Cancelled,

    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;
