use vitals_client::records::{self, SLEEP_COLLECTION, SleepRecord};
use vitals_client::{RecordQuery, RecordStore, SleepProvider, SleepSummary};

use super::{Domain, DomainOutcome, LoadContext, bounded, two_tier};
use crate::error::SourceError;
use crate::types::{GoalProgress, SLEEP_TARGET_MINUTES};

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

pub async fn load(
    ctx: &LoadContext<'_>,
    provider: &dyn SleepProvider,
    store: &dyn RecordStore,
) -> DomainOutcome<GoalProgress> {
    let primary = async {
        bounded(ctx.call_timeout, provider.todays_sleep_summary(ctx.user.as_str()))
            .await
            .map(|s| from_summary(&s))
            .map_err(|e| SourceError::provider(Domain::Sleep, e))
    };
    two_tier(
        Domain::Sleep,
        primary,
        || from_records(ctx, store),
        GoalProgress::new(0.0, SLEEP_TARGET_MINUTES),
    )
    .await
}

pub fn from_summary(summary: &SleepSummary) -> GoalProgress {
    let minutes = summary
        .actual
        .as_ref()
        .map(|a| a.sleep_duration)
        .unwrap_or(0.0);
    GoalProgress::new(minutes, SLEEP_TARGET_MINUTES)
}

async fn from_records(
    ctx: &LoadContext<'_>,
    store: &dyn RecordStore,
) -> Result<GoalProgress, SourceError> {
    let query = RecordQuery::collection(SLEEP_COLLECTION)
        .eq("userId", ctx.user.as_str())
        .eq("date", ctx.date_str())
        .limit(1);
    let docs = bounded(ctx.call_timeout, store.query(&query))
        .await
        .map_err(|e| SourceError::fallback(Domain::Sleep, e))?;
    let doc = docs
        .first()
        .ok_or_else(|| SourceError::fallback(Domain::Sleep, "no sleep record for the day"))?;
    let record: SleepRecord =
        records::decode(doc).map_err(|e| SourceError::fallback(Domain::Sleep, e))?;
    let minutes = sleep_minutes(&record).ok_or_else(|| {
        SourceError::fallback(Domain::Sleep, "sleep record lacks bedtime or wake time")
    })?;
    Ok(GoalProgress::new(minutes, SLEEP_TARGET_MINUTES))
}

/// Minutes between bedtime and wake time. A negative span means the times
/// were logged against the same day across midnight, so a day is added.
pub fn sleep_minutes(record: &SleepRecord) -> Option<f64> {
    let (bed, wake) = (record.bedtime?, record.wake_time?);
    let mut minutes = (wake - bed).num_seconds() as f64 / 60.0;
    if minutes < 0.0 {
        minutes += MINUTES_PER_DAY;
    }
    Some(minutes.max(0.0))
}
