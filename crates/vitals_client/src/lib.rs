//! Collaborator contracts for the daily health dashboard.
//!
//! The per-domain summary providers, the raw record store and the types they
//! exchange live here, together with reqwest-based implementations of each.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod config;
pub mod firestore;
pub mod http_client;
pub mod records;
pub mod store;

pub use records::{DRINK_TYPES, DrinkType};
pub use store::{Document, FieldFilter, FilterOp, FilterValue, RecordQuery, RecordStore};

#[derive(Debug, Error)]
pub enum VitalsError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Auth(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
}

impl VitalsError {
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            404 => VitalsError::NotFound(body),
            401 | 403 => VitalsError::Auth(body),
            _ => VitalsError::Status { status, body },
        }
    }
}

impl From<serde_json::Error> for VitalsError {
    fn from(err: serde_json::Error) -> Self {
        VitalsError::Decode(err.to_string())
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionGoals {
    pub calorie_goal: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionDailySummary {
    #[serde(default)]
    pub total_nutrition: NutritionTotals,
    #[serde(default)]
    pub goals: Option<NutritionGoals>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HydrationDailySummary {
    #[serde(default)]
    pub total_consumed: f64,
    #[serde(default)]
    pub target_amount: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepActual {
    /// Minutes asleep.
    pub sleep_duration: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    #[serde(default)]
    pub actual: Option<SleepActual>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExercise {
    pub name: String,
    #[serde(default)]
    pub sets: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    #[serde(default)]
    pub completed_exercises: Vec<CompletedExercise>,
    #[serde(default)]
    pub total_calories_burned: f64,
}

#[async_trait]
pub trait NutritionProvider: Send + Sync + 'static {
    /// Pre-aggregated intake for `date` (`YYYY-MM-DD`) plus the user's goal, if configured.
    async fn daily_summary(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<NutritionDailySummary, VitalsError>;
}

#[async_trait]
pub trait HydrationProvider: Send + Sync + 'static {
    async fn daily_summary(
        &self,
        user_id: &str,
        date: &str,
    ) -> Result<HydrationDailySummary, VitalsError>;

    /// Daily hydration target in ml.
    async fn user_hydration_goal(&self, user_id: &str) -> Result<f64, VitalsError>;

    /// Known drink types. The first entry is used for unknown ids.
    fn drink_types(&self) -> &[DrinkType] {
        DRINK_TYPES
    }
}

#[async_trait]
pub trait SleepProvider: Send + Sync + 'static {
    async fn todays_sleep_summary(&self, user_id: &str) -> Result<SleepSummary, VitalsError>;
}

#[async_trait]
pub trait WorkoutProvider: Send + Sync + 'static {
    async fn todays_workout_summary(&self, user_id: &str) -> Result<WorkoutSummary, VitalsError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_status_maps_known_codes() {
        assert!(matches!(
            VitalsError::from_status(404, "gone"),
            VitalsError::NotFound(_)
        ));
        assert!(matches!(
            VitalsError::from_status(403, "nope"),
            VitalsError::Auth(_)
        ));
        assert!(matches!(
            VitalsError::from_status(502, "bad"),
            VitalsError::Status { status: 502, .. }
        ));
    }

    #[test]
    fn nutrition_summary_without_goals_deserializes() {
        let payload = json!({"totalNutrition": {"calories": 1234.5}});
        let s: NutritionDailySummary = serde_json::from_value(payload).expect("deserialize");
        assert_eq!(s.total_nutrition.calories, 1234.5);
        assert!(s.goals.is_none());
    }

    #[test]
    fn sleep_summary_missing_actual_is_none() {
        let s: SleepSummary = serde_json::from_value(json!({})).expect("deserialize");
        assert!(s.actual.is_none());
    }

    #[test]
    fn workout_summary_reads_camel_case() {
        let payload = json!({
            "completedExercises": [{"name": "Squat", "sets": 3}, {"name": "Plank"}],
            "totalCaloriesBurned": 120
        });
        let s: WorkoutSummary = serde_json::from_value(payload).expect("deserialize");
        assert_eq!(s.completed_exercises.len(), 2);
        assert_eq!(s.completed_exercises[1].sets, None);
        assert_eq!(s.total_calories_burned, 120.0);
    }
}
