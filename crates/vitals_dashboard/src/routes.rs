//! HTTP surface: health, Prometheus metrics and the dashboard JSON.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

use crate::aggregator::DailyStatsAggregator;
use crate::error::DashboardError;
use crate::services::DashboardSnapshot;
use crate::types::{CalendarDate, UserId};

pub struct AppState {
    pub aggregator: Arc<DailyStatsAggregator>,
    pub metrics: Option<PrometheusHandle>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<String>,
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardSnapshot>, (StatusCode, String)> {
    let user = UserId::new(&user_id).map_err(map_err)?;
    let date = match params.date.as_deref() {
        Some(raw) => CalendarDate::parse(raw).map_err(map_err)?,
        None => CalendarDate::today_in(state.aggregator.options().zone),
    };
    let report = state.aggregator.compute_report(&user, date).await;
    Ok(Json(DashboardSnapshot::from_report(user, date, report)))
}

fn map_err(e: DashboardError) -> (StatusCode, String) {
    match e {
        DashboardError::MissingUser => (StatusCode::UNAUTHORIZED, e.to_string()),
        DashboardError::InvalidUserId(_) | DashboardError::InvalidDate(_) => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        DashboardError::Cancelled | DashboardError::Config(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub fn router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/users/{user_id}/dashboard", get(get_dashboard))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
