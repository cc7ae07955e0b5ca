mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use common::{MockProviders, aggregator};
use vitals_client::store::InMemoryRecordStore;
use vitals_client::{SleepActual, SleepSummary};
use vitals_dashboard::routes::{AppState, router};

fn app(providers: MockProviders) -> axum::Router {
    let agg = aggregator(Arc::new(providers), Arc::new(InMemoryRecordStore::new()));
    let state = Arc::new(AppState {
        aggregator: Arc::new(agg),
        metrics: None,
    });
    router(state, Duration::from_secs(5))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get(app(MockProviders::failing()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn dashboard_returns_snapshot_json() {
    let providers = MockProviders {
        sleep: Some(SleepSummary {
            actual: Some(SleepActual {
                sleep_duration: 450.0,
            }),
        }),
        ..MockProviders::failing()
    };
    let (status, body) = get(app(providers), "/api/v1/users/u1/dashboard?date=2025-03-10").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["userId"], "u1");
    assert_eq!(json["date"], "2025-03-10");
    assert_eq!(json["summary"]["sleep"]["value"], 450.0);
    assert_eq!(json["summary"]["sleep"]["target"], 480.0);
    assert_eq!(json["sources"]["sleep"], "primary");
    // Empty record collections are a successful fallback.
    assert_eq!(json["sources"]["nutrition"], "fallback");
    assert_eq!(json["sources"]["workouts"], "default");
    assert_eq!(json["cards"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["cards"][2]["value"], "7h 30m");
    assert_eq!(json["cards"][2]["icon"], "moon");
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let (status, body) = get(
        app(MockProviders::failing()),
        "/api/v1/users/u1/dashboard?date=10-03-2025",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&body).contains("10-03-2025"));
}

#[tokio::test]
async fn blank_user_id_is_rejected() {
    let providers = Arc::new(MockProviders::failing());
    let agg = aggregator(providers.clone(), Arc::new(InMemoryRecordStore::new()));
    let app = router(
        Arc::new(AppState {
            aggregator: Arc::new(agg),
            metrics: None,
        }),
        Duration::from_secs(5),
    );

    let (status, _) = get(app, "/api/v1/users/%20/dashboard?date=2025-03-10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(providers.call_count(), 0);
}

#[tokio::test]
async fn metrics_without_recorder_is_empty() {
    let (status, body) = get(app(MockProviders::failing()), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}
