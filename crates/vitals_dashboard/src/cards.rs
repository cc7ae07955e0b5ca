//! Presentation model for the dashboard's metric cards.
//!
//! Icons are identifiers only; mapping an [`IconId`] to a glyph belongs to the
//! rendering layer.

use serde::Serialize;

use crate::types::DailySummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconId {
    Flame,
    Droplet,
    Moon,
    Dumbbell,
    Home,
    Activity,
    User,
    Settings,
}

impl IconId {
    pub fn name(self) -> &'static str {
        match self {
            IconId::Flame => "flame",
            IconId::Droplet => "droplet",
            IconId::Moon => "moon",
            IconId::Dumbbell => "dumbbell",
            IconId::Home => "home",
            IconId::Activity => "activity",
            IconId::User => "user",
            IconId::Settings => "settings",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Calories,
    Water,
    Sleep,
    Workouts,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Calories,
        MetricKind::Water,
        MetricKind::Sleep,
        MetricKind::Workouts,
    ];

    pub fn title(self) -> &'static str {
        match self {
            MetricKind::Calories => "Calories",
            MetricKind::Water => "Water",
            MetricKind::Sleep => "Sleep",
            MetricKind::Workouts => "Workouts",
        }
    }

    pub fn icon(self) -> IconId {
        match self {
            MetricKind::Calories => IconId::Flame,
            MetricKind::Water => IconId::Droplet,
            MetricKind::Sleep => IconId::Moon,
            MetricKind::Workouts => IconId::Dumbbell,
        }
    }

    pub fn format_value(self, summary: &DailySummary) -> String {
        match self {
            MetricKind::Calories => format!("{} kcal", thousands(summary.calories.value)),
            MetricKind::Water => litres(summary.water.value),
            MetricKind::Sleep => hours_minutes(summary.sleep.value),
            MetricKind::Workouts => match summary.workouts.count {
                1 => "1 session".to_string(),
                n => format!("{n} sessions"),
            },
        }
    }

    pub fn format_target(self, summary: &DailySummary) -> String {
        match self {
            MetricKind::Calories => format!("of {} kcal", thousands(summary.calories.target)),
            MetricKind::Water => format!("of {}", litres(summary.water.target)),
            MetricKind::Sleep => format!("of {}", hours_minutes(summary.sleep.target)),
            MetricKind::Workouts => format!("{} min", summary.workouts.duration),
        }
    }

    /// Workouts have no goal, so no progress.
    pub fn progress(self, summary: &DailySummary) -> Option<f64> {
        match self {
            MetricKind::Calories => Some(summary.calories.progress),
            MetricKind::Water => Some(summary.water.progress),
            MetricKind::Sleep => Some(summary.sleep.progress),
            MetricKind::Workouts => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardCard {
    pub kind: MetricKind,
    pub icon: IconId,
    pub title: &'static str,
    pub value: String,
    pub target: String,
    pub progress: Option<f64>,
}

pub fn cards(summary: &DailySummary) -> Vec<DashboardCard> {
    MetricKind::ALL
        .into_iter()
        .map(|kind| DashboardCard {
            kind,
            icon: kind.icon(),
            title: kind.title(),
            value: kind.format_value(summary),
            target: kind.format_target(summary),
            progress: kind.progress(summary),
        })
        .collect()
}

fn thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn litres(ml: f64) -> String {
    format!("{:.1} L", ml / 1000.0)
}

fn hours_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    format!("{}h {}m", total / 60, total % 60)
}
