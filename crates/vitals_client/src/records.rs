//! Raw per-domain records as stored in the document database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Document, VitalsError};

pub const MEALS_COLLECTION: &str = "meals";
pub const HYDRATION_COLLECTION: &str = "hydration";
pub const SLEEP_COLLECTION: &str = "sleepRecords";
pub const WORKOUT_PLANS_COLLECTION: &str = "workoutPlans";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub user_id: String,
    pub consumed_at: DateTime<Utc>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HydrationRecord {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    /// Volume in ml.
    pub amount: f64,
    /// Absent or non-string values count as the first known drink type.
    #[serde(default, deserialize_with = "lenient_string")]
    pub drink_type: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecord {
    pub user_id: String,
    /// `YYYY-MM-DD` of the night's wake-up day.
    pub date: String,
    #[serde(default)]
    pub bedtime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub wake_time: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExercise {
    pub name: String,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// English weekday name, e.g. `"Monday"`.
    pub day: String,
    #[serde(default)]
    pub exercises: Vec<PlannedExercise>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlanRecord {
    pub user_id: String,
    #[serde(default)]
    pub weekly_plan: Vec<DayPlan>,
}

impl WorkoutPlanRecord {
    pub fn day(&self, weekday: &str) -> Option<&DayPlan> {
        self.weekly_plan
            .iter()
            .find(|d| d.day.eq_ignore_ascii_case(weekday))
    }
}

/// Decode a store document into one of the record types above.
pub fn decode<T: serde::de::DeserializeOwned>(doc: &Document) -> Result<T, VitalsError> {
    serde_json::from_value(serde_json::Value::Object(doc.fields.clone()))
        .map_err(|e| VitalsError::Decode(format!("document {}: {e}", doc.id)))
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct DrinkType {
    pub id: &'static str,
    pub name: &'static str,
    /// Effective water contribution relative to plain water.
    pub hydration_value: f64,
}

pub const DRINK_TYPES: &[DrinkType] = &[
    DrinkType {
        id: "water",
        name: "Water",
        hydration_value: 1.0,
    },
    DrinkType {
        id: "tea",
        name: "Tea",
        hydration_value: 0.9,
    },
    DrinkType {
        id: "coffee",
        name: "Coffee",
        hydration_value: 0.8,
    },
    DrinkType {
        id: "juice",
        name: "Juice",
        hydration_value: 0.85,
    },
    DrinkType {
        id: "milk",
        name: "Milk",
        hydration_value: 0.9,
    },
    DrinkType {
        id: "sports_drink",
        name: "Sports Drink",
        hydration_value: 1.0,
    },
    DrinkType {
        id: "soda",
        name: "Soda",
        hydration_value: 0.6,
    },
];

/// Multiplier for `drink_type`, falling back to the first table entry.
/// An empty table counts everything as plain water.
pub fn hydration_value(table: &[DrinkType], drink_type: Option<&str>) -> f64 {
    table
        .iter()
        .find(|d| Some(d.id) == drink_type)
        .or_else(|| table.first())
        .map(|d| d.hydration_value)
        .unwrap_or(1.0)
}
