use vitals_client::records::{self, DayPlan, WORKOUT_PLANS_COLLECTION, WorkoutPlanRecord};
use vitals_client::{RecordQuery, RecordStore, WorkoutProvider, WorkoutSummary};

use super::{Domain, DomainOutcome, LoadContext, bounded, two_tier};
use crate::error::SourceError;
use crate::types::WorkoutStats;

/// Estimated kcal per set of a completed exercise (two minutes at five kcal/min).
const KCAL_PER_SET: f64 = 2.0 * 5.0;

pub async fn load(
    ctx: &LoadContext<'_>,
    provider: &dyn WorkoutProvider,
    store: &dyn RecordStore,
) -> DomainOutcome<WorkoutStats> {
    let primary = async {
        bounded(ctx.call_timeout, provider.todays_workout_summary(ctx.user.as_str()))
            .await
            .map(|s| from_summary(&s))
            .map_err(|e| SourceError::provider(Domain::Workouts, e))
    };
    two_tier(
        Domain::Workouts,
        primary,
        || from_records(ctx, store),
        WorkoutStats::default(),
    )
    .await
}

pub fn from_summary(summary: &WorkoutSummary) -> WorkoutStats {
    let count = u32::try_from(summary.completed_exercises.len()).unwrap_or(u32::MAX);
    WorkoutStats::new(count, summary.total_calories_burned)
}

async fn from_records(
    ctx: &LoadContext<'_>,
    store: &dyn RecordStore,
) -> Result<WorkoutStats, SourceError> {
    let query = RecordQuery::collection(WORKOUT_PLANS_COLLECTION)
        .eq("userId", ctx.user.as_str())
        .limit(1);
    let docs = bounded(ctx.call_timeout, store.query(&query))
        .await
        .map_err(|e| SourceError::fallback(Domain::Workouts, e))?;
    let doc = docs
        .first()
        .ok_or_else(|| SourceError::fallback(Domain::Workouts, "no workout plan"))?;
    let plan: WorkoutPlanRecord =
        records::decode(doc).map_err(|e| SourceError::fallback(Domain::Workouts, e))?;

    let weekday = ctx.date.weekday_name();
    let Some(day) = plan.day(weekday) else {
        tracing::debug!(user = %ctx.user, weekday, "no plan for weekday");
        return Ok(WorkoutStats::default());
    };
    Ok(completed_workout_totals(day))
}

/// Count completed exercises and estimate calories as Σ `sets × 2 × 5`.
pub fn completed_workout_totals(day: &DayPlan) -> WorkoutStats {
    let (count, calories) = day
        .exercises
        .iter()
        .filter(|e| e.completed)
        .fold((0u32, 0.0f64), |(n, kcal), e| {
            (n + 1, kcal + f64::from(e.sets) * KCAL_PER_SET)
        });
    WorkoutStats::new(count, calories)
}
