use vitals_client::records::{self, HYDRATION_COLLECTION, HydrationRecord};
use vitals_client::{DrinkType, FilterOp, HydrationProvider, RecordQuery, RecordStore};

use super::{Domain, DomainOutcome, LoadContext, bounded, decode_records, two_tier};
use crate::error::SourceError;
use crate::types::{DEFAULT_WATER_TARGET_ML, GoalProgress};

pub async fn load(
    ctx: &LoadContext<'_>,
    provider: &dyn HydrationProvider,
    store: &dyn RecordStore,
) -> DomainOutcome<GoalProgress> {
    let date = ctx.date_str();
    let primary = async {
        bounded(ctx.call_timeout, provider.daily_summary(ctx.user.as_str(), &date))
            .await
            .map(|s| GoalProgress::new(s.total_consumed, s.target_amount))
            .map_err(|e| SourceError::provider(Domain::Hydration, e))
    };
    two_tier(
        Domain::Hydration,
        primary,
        || from_records(ctx, provider, store),
        GoalProgress::new(0.0, DEFAULT_WATER_TARGET_ML),
    )
    .await
}

async fn from_records(
    ctx: &LoadContext<'_>,
    provider: &dyn HydrationProvider,
    store: &dyn RecordStore,
) -> Result<GoalProgress, SourceError> {
    let query = RecordQuery::collection(HYDRATION_COLLECTION)
        .eq("userId", ctx.user.as_str())
        .filter("timestamp", FilterOp::GreaterThanOrEqual, ctx.start())
        .filter("timestamp", FilterOp::LessThan, ctx.end());
    let docs = bounded(ctx.call_timeout, store.query(&query))
        .await
        .map_err(|e| SourceError::fallback(Domain::Hydration, e))?;
    let entries: Vec<HydrationRecord> = decode_records(Domain::Hydration, &docs);
    let total = effective_hydration(&entries, provider.drink_types());

    let target = match bounded(ctx.call_timeout, provider.user_hydration_goal(ctx.user.as_str())).await {
        Ok(goal) => goal,
        Err(e) => {
            tracing::warn!(user = %ctx.user, error = %e, "hydration goal unavailable; using default");
            DEFAULT_WATER_TARGET_ML
        }
    };
    Ok(GoalProgress::new(total, target))
}

/// Σ `amount × hydration_value(drink_type)` in ml.
pub fn effective_hydration(entries: &[HydrationRecord], drink_types: &[DrinkType]) -> f64 {
    entries
        .iter()
        .map(|e| e.amount * records::hydration_value(drink_types, e.drink_type.as_deref()))
        .sum()
}
