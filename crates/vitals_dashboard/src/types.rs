use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DashboardError;

pub const DEFAULT_CALORIE_TARGET: f64 = 2000.0;
pub const DEFAULT_WATER_TARGET_ML: f64 = 2000.0;
pub const SLEEP_TARGET_MINUTES: f64 = 480.0;
/// Minutes credited per completed exercise.
pub const MINUTES_PER_WORKOUT: u32 = 30;

/// Stable identifier of the signed-in user. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DashboardError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DashboardError::InvalidUserId(raw.as_ref().to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar day, written `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct CalendarDate(NaiveDate);

/// UTC instants covering `[00:00:00, 23:59:59)` of a local day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Time zone in which calendar days are cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayZone {
    /// The host zone. Its offset is looked up per instant, so days on either
    /// side of a DST change get their own offset.
    Local,
    Fixed(FixedOffset),
}

impl DayZone {
    /// UTC instant of a wall-clock time in this zone. A time skipped by a DST
    /// gap resolves with the offset in effect just before the gap.
    pub fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self {
            DayZone::Fixed(offset) => DateTime::from_naive_utc_and_offset(local - *offset, Utc),
            DayZone::Local => match Local.from_local_datetime(&local).earliest() {
                Some(t) => t.with_timezone(&Utc),
                None => {
                    let before = local - chrono::Duration::hours(1);
                    let offset = Local
                        .from_local_datetime(&before)
                        .earliest()
                        .map(|t| *t.offset())
                        .unwrap_or_else(|| *Local::now().offset());
                    DateTime::from_naive_utc_and_offset(local - offset, Utc)
                }
            },
        }
    }

    pub fn today(&self) -> CalendarDate {
        match self {
            DayZone::Fixed(offset) => CalendarDate(Utc::now().with_timezone(offset).date_naive()),
            DayZone::Local => CalendarDate(Local::now().date_naive()),
        }
    }
}

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn parse(s: &str) -> Result<Self, DashboardError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DashboardError::InvalidDate(s.to_string()))
    }

    pub fn today_in(zone: DayZone) -> Self {
        zone.today()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Both ends are resolved separately, so a day containing a DST change
    /// spans 23 or 25 hours.
    pub fn bounds_in(&self, zone: DayZone) -> DayBounds {
        let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        DayBounds {
            start: zone.to_utc(self.0.and_time(NaiveTime::MIN)),
            end: zone.to_utc(self.0.and_time(last_second)),
        }
    }

    pub fn weekday_name(&self) -> &'static str {
        match self.0.weekday() {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

/// Percentage of `target` reached, clamped to `[0, 100]`. Zero when the
/// target is not positive or either input is not finite.
pub fn progress(value: f64, target: f64) -> f64 {
    if !value.is_finite() || !target.is_finite() || target <= 0.0 {
        return 0.0;
    }
    let pct = value / target * 100.0;
    if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub value: f64,
    pub target: f64,
    pub progress: f64,
}

impl GoalProgress {
    pub fn new(value: f64, target: f64) -> Self {
        Self {
            value,
            target,
            progress: progress(value, target),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStats {
    pub count: u32,
    /// Minutes, `count × 30`.
    pub duration: u32,
    pub calories: f64,
}

impl WorkoutStats {
    pub fn new(count: u32, calories: f64) -> Self {
        Self {
            count,
            duration: count.saturating_mul(MINUTES_PER_WORKOUT),
            calories,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub calories: GoalProgress,
    /// Millilitres.
    pub water: GoalProgress,
    /// Minutes.
    pub sleep: GoalProgress,
    pub workouts: WorkoutStats,
}
