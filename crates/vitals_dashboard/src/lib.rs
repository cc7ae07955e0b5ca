//! Daily health dashboard: aggregation of nutrition, hydration, sleep and
//! workout figures, plus the presentation model and HTTP surface built on it.

pub mod aggregator;
pub mod cards;
pub mod config;
pub mod domains;
pub mod error;
pub mod observability;
pub mod routes;
pub mod services;
pub mod theme;
pub mod types;

pub use aggregator::{DailyStatsAggregator, SourceReport, SummaryProviders, SummaryReport};
pub use cards::{DashboardCard, IconId, MetricKind};
pub use config::{AggregatorOptions, ServerOptions};
pub use domains::{Domain, Source};
pub use error::{DashboardError, DashboardResult, SourceError};
pub use services::{DashboardService, DashboardSnapshot, RefreshHandle};
pub use theme::{Theme, ThemePreference, ThemeState};
pub use types::{CalendarDate, DailySummary, DayZone, GoalProgress, UserId, WorkoutStats};
