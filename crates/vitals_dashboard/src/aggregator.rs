//! Daily statistics aggregation across the four tracked domains.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use vitals_client::{
    HydrationProvider, NutritionProvider, RecordStore, SleepProvider, WorkoutProvider,
};

use crate::config::AggregatorOptions;
use crate::domains::{self, LoadContext, Source};
use crate::types::{CalendarDate, DailySummary, UserId};

/// The four summary providers consulted on the primary tier.
#[derive(Clone)]
pub struct SummaryProviders {
    pub nutrition: Arc<dyn NutritionProvider>,
    pub hydration: Arc<dyn HydrationProvider>,
    pub sleep: Arc<dyn SleepProvider>,
    pub workouts: Arc<dyn WorkoutProvider>,
}

impl SummaryProviders {
    /// Use one client for all four domains.
    pub fn from_client<C>(client: Arc<C>) -> Self
    where
        C: NutritionProvider + HydrationProvider + SleepProvider + WorkoutProvider,
    {
        Self {
            nutrition: client.clone(),
            hydration: client.clone(),
            sleep: client.clone(),
            workouts: client,
        }
    }
}

/// Tier that produced each part of a summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub nutrition: Source,
    pub hydration: Source,
    pub sleep: Source,
    pub workouts: Source,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SummaryReport {
    pub summary: DailySummary,
    pub sources: SourceReport,
}

#[derive(Clone)]
pub struct DailyStatsAggregator {
    providers: SummaryProviders,
    store: Arc<dyn RecordStore>,
    options: AggregatorOptions,
}

impl DailyStatsAggregator {
    pub fn new(
        providers: SummaryProviders,
        store: Arc<dyn RecordStore>,
        options: AggregatorOptions,
    ) -> Self {
        Self {
            providers,
            store,
            options,
        }
    }

    pub fn options(&self) -> &AggregatorOptions {
        &self.options
    }

    /// Summary for `user` on `date`. Never fails: each domain degrades to
    /// its fallback and then to its defaults independently.
    pub async fn compute_daily_summary(&self, user: &UserId, date: CalendarDate) -> DailySummary {
        self.compute_report(user, date).await.summary
    }

    /// Like [`compute_daily_summary`](Self::compute_daily_summary), also
    /// reporting which tier each domain came from.
    pub async fn compute_report(&self, user: &UserId, date: CalendarDate) -> SummaryReport {
        let ctx = LoadContext {
            user,
            date,
            bounds: date.bounds_in(self.options.zone),
            call_timeout: self.options.call_timeout,
        };
        let store = self.store.as_ref();

        let (calories, water, sleep, workouts) = tokio::join!(
            domains::nutrition::load(&ctx, self.providers.nutrition.as_ref(), store),
            domains::hydration::load(&ctx, self.providers.hydration.as_ref(), store),
            domains::sleep::load(&ctx, self.providers.sleep.as_ref(), store),
            domains::workouts::load(&ctx, self.providers.workouts.as_ref(), store),
        );

        tracing::info!(
            user = %user,
            %date,
            nutrition = calories.source.as_str(),
            hydration = water.source.as_str(),
            sleep = sleep.source.as_str(),
            workouts = workouts.source.as_str(),
            "daily summary computed"
        );

        SummaryReport {
            summary: DailySummary {
                calories: calories.value,
                water: water.value,
                sleep: sleep.value,
                workouts: workouts.value,
            },
            sources: SourceReport {
                nutrition: calories.source,
                hydration: water.source,
                sleep: sleep.source,
                workouts: workouts.source,
            },
        }
    }

    /// Returns `None` if `cancel` flips to `true` before the summary is
    /// complete. In-flight calls are dropped and nothing partial escapes.
    pub async fn compute_daily_summary_until_cancelled(
        &self,
        user: &UserId,
        date: CalendarDate,
        cancel: watch::Receiver<bool>,
    ) -> Option<DailySummary> {
        self.compute_report_until_cancelled(user, date, cancel)
            .await
            .map(|r| r.summary)
    }

    pub async fn compute_report_until_cancelled(
        &self,
        user: &UserId,
        date: CalendarDate,
        mut cancel: watch::Receiver<bool>,
    ) -> Option<SummaryReport> {
        if *cancel.borrow_and_update() {
            return None;
        }
        tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => {
                tracing::debug!(user = %user, %date, "aggregation cancelled");
                None
            }
            report = self.compute_report(user, date) => Some(report),
        }
    }
}

/// Resolves once `rx` reads `true`. Never resolves if the sender goes away
/// without cancelling.
pub(crate) async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|c| *c).await.is_err() {
        std::future::pending::<()>().await;
    }
}
