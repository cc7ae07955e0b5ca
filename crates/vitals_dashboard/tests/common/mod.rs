//! Scriptable summary providers shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chrono::FixedOffset;
use vitals_client::store::InMemoryRecordStore;
use vitals_client::{
    HydrationDailySummary, HydrationProvider, NutritionDailySummary, NutritionProvider,
    SleepProvider, SleepSummary, VitalsError, WorkoutProvider, WorkoutSummary,
};
use vitals_dashboard::{AggregatorOptions, DailyStatsAggregator, DayZone, SummaryProviders};

/// Every field left `None` makes that call fail with a 503.
#[derive(Default)]
pub struct MockProviders {
    pub nutrition: Option<NutritionDailySummary>,
    pub hydration: Option<HydrationDailySummary>,
    pub hydration_goal: Option<f64>,
    pub sleep: Option<SleepSummary>,
    pub workouts: Option<WorkoutSummary>,
    pub delay: Option<Duration>,
    pub calls: AtomicU32,
}

impl MockProviders {
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer<T: Clone>(&self, value: &Option<T>) -> Result<T, VitalsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        value.clone().ok_or(VitalsError::Status {
            status: 503,
            body: "unavailable".into(),
        })
    }
}

#[async_trait]
impl NutritionProvider for MockProviders {
    async fn daily_summary(
        &self,
        _user_id: &str,
        _date: &str,
    ) -> Result<NutritionDailySummary, VitalsError> {
        self.answer(&self.nutrition).await
    }
}

#[async_trait]
impl HydrationProvider for MockProviders {
    async fn daily_summary(
        &self,
        _user_id: &str,
        _date: &str,
    ) -> Result<HydrationDailySummary, VitalsError> {
        self.answer(&self.hydration).await
    }

    async fn user_hydration_goal(&self, _user_id: &str) -> Result<f64, VitalsError> {
        self.answer(&self.hydration_goal).await
    }
}

#[async_trait]
impl SleepProvider for MockProviders {
    async fn todays_sleep_summary(&self, _user_id: &str) -> Result<SleepSummary, VitalsError> {
        self.answer(&self.sleep).await
    }
}

#[async_trait]
impl WorkoutProvider for MockProviders {
    async fn todays_workout_summary(&self, _user_id: &str) -> Result<WorkoutSummary, VitalsError> {
        self.answer(&self.workouts).await
    }
}

pub fn utc_options(call_timeout: Duration) -> AggregatorOptions {
    AggregatorOptions {
        call_timeout,
        zone: DayZone::Fixed(FixedOffset::east_opt(0).expect("utc offset")),
    }
}

pub fn aggregator(
    providers: Arc<MockProviders>,
    store: Arc<InMemoryRecordStore>,
) -> DailyStatsAggregator {
    DailyStatsAggregator::new(
        SummaryProviders::from_client(providers),
        store,
        utc_options(Duration::from_secs(2)),
    )
}
