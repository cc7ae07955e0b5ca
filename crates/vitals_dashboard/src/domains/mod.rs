//! Per-domain loaders.
//!
//! Every domain follows the same policy: ask the summary provider first, and
//! only when that call fails recompute the figure from raw records. If both
//! tiers fail the domain reports its defaults.
//!
//! - [`nutrition`]: calories eaten against the calorie goal
//! - [`hydration`]: effective water intake against the hydration goal
//! - [`sleep`]: minutes slept against a fixed eight hours
//! - [`workouts`]: completed exercises and estimated calories burned

use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use vitals_client::{Document, FilterValue, VitalsError, records};

use crate::error::SourceError;
use crate::observability;
use crate::types::{CalendarDate, DayBounds, UserId};

pub mod hydration;
pub mod nutrition;
pub mod sleep;
pub mod workouts;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Nutrition,
    Hydration,
    Sleep,
    Workouts,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Nutrition => "nutrition",
            Domain::Hydration => "hydration",
            Domain::Sleep => "sleep",
            Domain::Workouts => "workouts",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier produced a domain's figures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Primary,
    Fallback,
    Default,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Primary => "primary",
            Source::Fallback => "fallback",
            Source::Default => "default",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainOutcome<T> {
    pub value: T,
    pub source: Source,
}

/// Inputs shared by the four loaders for one aggregation.
#[derive(Clone, Copy, Debug)]
pub struct LoadContext<'a> {
    pub user: &'a UserId,
    pub date: CalendarDate,
    pub bounds: DayBounds,
    pub call_timeout: Duration,
}

impl LoadContext<'_> {
    pub fn date_str(&self) -> String {
        self.date.to_string()
    }

    pub fn start(&self) -> FilterValue {
        FilterValue::Timestamp(self.bounds.start)
    }

    pub fn end(&self) -> FilterValue {
        FilterValue::Timestamp(self.bounds.end)
    }
}

/// Await `fut`, turning an elapsed `limit` into [`VitalsError::Timeout`].
pub async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, VitalsError>
where
    F: Future<Output = Result<T, VitalsError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(VitalsError::Timeout(limit)),
    }
}

/// Run the primary tier, then the fallback tier only if primary failed, then
/// settle on `default`.
pub async fn two_tier<T, P, F, Fut>(domain: Domain, primary: P, fallback: F, default: T) -> DomainOutcome<T>
where
    P: Future<Output = Result<T, SourceError>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let outcome = match primary.await {
        Ok(value) => {
            tracing::debug!(%domain, "primary summary used");
            DomainOutcome {
                value,
                source: Source::Primary,
            }
        }
        Err(primary_err) => {
            tracing::warn!(%domain, error = %primary_err, "summary provider failed; recomputing from records");
            match fallback().await {
                Ok(value) => DomainOutcome {
                    value,
                    source: Source::Fallback,
                },
                Err(fallback_err) => {
                    tracing::warn!(%domain, error = %fallback_err, "fallback failed; using defaults");
                    DomainOutcome {
                        value: default,
                        source: Source::Default,
                    }
                }
            }
        }
    };
    observability::record_source(domain, outcome.source);
    outcome
}

/// Decode every document, skipping (and logging) the ones that do not fit.
pub(crate) fn decode_records<T: serde::de::DeserializeOwned>(
    domain: Domain,
    docs: &[Document],
) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match records::decode::<T>(doc) {
            Ok(rec) => Some(rec),
            Err(e) => {
                tracing::warn!(%domain, error = %e, "skipping undecodable record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn fallback_not_run_when_primary_succeeds() {
        let calls = AtomicU32::new(0);
        let out = two_tier(
            Domain::Sleep,
            async { Ok::<_, SourceError>(1) },
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            },
            0,
        )
        .await;
        assert_eq!(out.value, 1);
        assert_eq!(out.source, Source::Primary);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn default_when_both_tiers_fail() {
        let out = two_tier(
            Domain::Nutrition,
            async { Err(SourceError::fallback(Domain::Nutrition, "primary down")) },
            || async { Err(SourceError::fallback(Domain::Nutrition, "no records")) },
            7,
        )
        .await;
        assert_eq!(out.value, 7);
        assert_eq!(out.source, Source::Default);
    }

    #[tokio::test]
    async fn bounded_reports_timeout() {
        let res: Result<(), _> = bounded(Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(res, Err(VitalsError::Timeout(_))));
    }
}
