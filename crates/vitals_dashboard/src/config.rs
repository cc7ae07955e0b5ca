//! Aggregation tuning read from the environment.

use chrono::FixedOffset;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::DashboardError;
use crate::types::DayZone;

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregatorOptions {
    /// Upper bound for every provider or store call. A call that runs
    /// longer counts as failed.
    pub call_timeout: Duration,
    /// Zone used to turn a calendar date into UTC day bounds.
    pub zone: DayZone,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            zone: DayZone::Local,
        }
    }
}

impl AggregatorOptions {
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads `VITALS_CALL_TIMEOUT_MS` and `VITALS_UTC_OFFSET_MINUTES` through
    /// `get`; unset keys keep their defaults.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, DashboardError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut opts = Self::default();
        if let Some(raw) = get("VITALS_CALL_TIMEOUT_MS") {
            let ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| {
                    DashboardError::Config(format!("VITALS_CALL_TIMEOUT_MS invalid: {raw}"))
                })?;
            opts.call_timeout = Duration::from_millis(ms);
        }
        if let Some(raw) = get("VITALS_UTC_OFFSET_MINUTES") {
            let offset = raw
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    DashboardError::Config(format!("VITALS_UTC_OFFSET_MINUTES invalid: {raw}"))
                })?;
            opts.zone = DayZone::Fixed(offset);
        }
        Ok(opts)
    }
}

/// HTTP server settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServerOptions {
    pub address: SocketAddr,
    pub request_timeout: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ServerOptions {
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads `ADDRESS` and `VITALS_REQUEST_TIMEOUT_SECS`; unset keys keep
    /// their defaults, unparsable ones are rejected.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, DashboardError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut opts = Self::default();
        if let Some(raw) = get("ADDRESS") {
            opts.address = raw
                .trim()
                .parse::<SocketAddr>()
                .map_err(|e| DashboardError::Config(format!("ADDRESS invalid: {raw}: {e}")))?;
        }
        if let Some(raw) = get("VITALS_REQUEST_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    DashboardError::Config(format!("VITALS_REQUEST_TIMEOUT_SECS invalid: {raw}"))
                })?;
            opts.request_timeout = Duration::from_secs(secs);
        }
        Ok(opts)
    }
}
