use vitals_client::records::{MEALS_COLLECTION, MealRecord};
use vitals_client::{FilterOp, NutritionDailySummary, NutritionProvider, RecordQuery, RecordStore};

use super::{Domain, DomainOutcome, LoadContext, bounded, decode_records, two_tier};
use crate::error::SourceError;
use crate::types::{DEFAULT_CALORIE_TARGET, GoalProgress};

pub async fn load(
    ctx: &LoadContext<'_>,
    provider: &dyn NutritionProvider,
    store: &dyn RecordStore,
) -> DomainOutcome<GoalProgress> {
    let date = ctx.date_str();
    let primary = async {
        bounded(ctx.call_timeout, provider.daily_summary(ctx.user.as_str(), &date))
            .await
            .map(|s| from_summary(&s))
            .map_err(|e| SourceError::provider(Domain::Nutrition, e))
    };
    two_tier(
        Domain::Nutrition,
        primary,
        || from_records(ctx, store),
        GoalProgress::new(0.0, DEFAULT_CALORIE_TARGET),
    )
    .await
}

pub fn from_summary(summary: &NutritionDailySummary) -> GoalProgress {
    let target = summary
        .goals
        .as_ref()
        .map(|g| g.calorie_goal)
        .unwrap_or(DEFAULT_CALORIE_TARGET);
    GoalProgress::new(summary.total_nutrition.calories, target)
}

async fn from_records(
    ctx: &LoadContext<'_>,
    store: &dyn RecordStore,
) -> Result<GoalProgress, SourceError> {
    let query = RecordQuery::collection(MEALS_COLLECTION)
        .eq("userId", ctx.user.as_str())
        .filter("consumedAt", FilterOp::GreaterThanOrEqual, ctx.start())
        .filter("consumedAt", FilterOp::LessThan, ctx.end());
    let docs = bounded(ctx.call_timeout, store.query(&query))
        .await
        .map_err(|e| SourceError::fallback(Domain::Nutrition, e))?;
    let meals: Vec<MealRecord> = decode_records(Domain::Nutrition, &docs);
    Ok(GoalProgress::new(total_calories(&meals), DEFAULT_CALORIE_TARGET))
}

pub fn total_calories(meals: &[MealRecord]) -> f64 {
    meals.iter().map(|m| m.calories).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vitals_client::{NutritionGoals, NutritionTotals};

    fn meal(calories: f64) -> MealRecord {
        MealRecord {
            user_id: "u1".into(),
            consumed_at: Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
            calories,
            name: None,
        }
    }

    #[test]
    fn total_calories_sums_meals() {
        assert_eq!(total_calories(&[meal(400.0), meal(650.5)]), 1050.5);
        assert_eq!(total_calories(&[]), 0.0);
    }

    #[test]
    fn summary_goal_overrides_default_target() {
        let s = NutritionDailySummary {
            total_nutrition: NutritionTotals {
                calories: 1100.0,
                ..Default::default()
            },
            goals: Some(NutritionGoals {
                calorie_goal: 2200.0,
            }),
        };
        let p = from_summary(&s);
        assert_eq!(p.target, 2200.0);
        assert_eq!(p.progress, 50.0);

        let no_goal = NutritionDailySummary::default();
        assert_eq!(from_summary(&no_goal).target, DEFAULT_CALORIE_TARGET);
    }
}
