//! Whole-stack run: the summary API is down, so every domain is rebuilt from
//! Firestore records served by a mock `runQuery` endpoint.

use secrecy::SecretString;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chrono::FixedOffset;
use vitals_client::firestore::FirestoreRecordStore;
use vitals_client::http_client::ReqwestSummaryClient;
use vitals_dashboard::{
    AggregatorOptions, CalendarDate, DailyStatsAggregator, DayZone, Source, SummaryProviders,
    UserId,
};

const RUN_QUERY: &str = "/v1/projects/proj/databases/(default)/documents:runQuery";

fn row(collection: &str, id: &str, fields: Value) -> Value {
    json!({
        "document": {
            "name": format!("projects/proj/databases/(default)/documents/{collection}/{id}"),
            "fields": fields
        },
        "readTime": "2025-03-10T12:00:00Z"
    })
}

async fn mount_collection(server: &MockServer, collection: &str, rows: Value) {
    Mock::given(method("POST"))
        .and(path(RUN_QUERY))
        .and(body_partial_json(json!({
            "structuredQuery": {"from": [{"collectionId": collection}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn summary_outage_recovers_every_domain_from_records() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/u1/hydration/goal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"targetAmount": 2500})))
        .mount(&api)
        .await;
    Mock::given(path_regex("^/api/v1/users/u1/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&api)
        .await;

    let firestore = MockServer::start().await;
    mount_collection(
        &firestore,
        "meals",
        json!([
            row("meals", "m1", json!({
                "userId": {"stringValue": "u1"},
                "consumedAt": {"timestampValue": "2025-03-10T08:00:00Z"},
                "calories": {"integerValue": "450"}
            })),
            row("meals", "m2", json!({
                "userId": {"stringValue": "u1"},
                "consumedAt": {"timestampValue": "2025-03-10T19:00:00Z"},
                "calories": {"doubleValue": 700.5}
            }))
        ]),
    )
    .await;
    mount_collection(
        &firestore,
        "hydration",
        json!([
            row("hydration", "h1", json!({
                "userId": {"stringValue": "u1"},
                "timestamp": {"timestampValue": "2025-03-10T09:00:00Z"},
                "amount": {"integerValue": "500"},
                "drinkType": {"stringValue": "water"}
            })),
            row("hydration", "h2", json!({
                "userId": {"stringValue": "u1"},
                "timestamp": {"timestampValue": "2025-03-10T10:00:00Z"},
                "amount": {"integerValue": "250"},
                "drinkType": {"stringValue": "coffee"}
            }))
        ]),
    )
    .await;
    mount_collection(
        &firestore,
        "sleepRecords",
        json!([row("sleepRecords", "s1", json!({
            "userId": {"stringValue": "u1"},
            "date": {"stringValue": "2025-03-10"},
            "bedtime": {"timestampValue": "2025-03-09T23:00:00Z"},
            "wakeTime": {"timestampValue": "2025-03-10T06:30:00Z"}
        }))]),
    )
    .await;
    mount_collection(
        &firestore,
        "workoutPlans",
        json!([row("workoutPlans", "p1", json!({
            "userId": {"stringValue": "u1"},
            "weeklyPlan": {"arrayValue": {"values": [
                {"mapValue": {"fields": {
                    "day": {"stringValue": "Monday"},
                    "exercises": {"arrayValue": {"values": [
                        {"mapValue": {"fields": {
                            "name": {"stringValue": "Squat"},
                            "sets": {"integerValue": "3"},
                            "completed": {"booleanValue": true}
                        }}},
                        {"mapValue": {"fields": {
                            "name": {"stringValue": "Bench"},
                            "sets": {"integerValue": "5"},
                            "completed": {"booleanValue": true}
                        }}}
                    ]}}
                }}}
            ]}}
        }))]),
    )
    .await;

    let client = Arc::new(ReqwestSummaryClient::new(
        &api.uri(),
        SecretString::new("tok".into()),
    ));
    let store = Arc::new(FirestoreRecordStore::new(&firestore.uri(), "proj", None));
    let agg = DailyStatsAggregator::new(
        SummaryProviders::from_client(client),
        store,
        AggregatorOptions {
            call_timeout: Duration::from_secs(5),
            zone: DayZone::Fixed(FixedOffset::east_opt(0).unwrap()),
        },
    );

    let report = agg
        .compute_report(
            &UserId::new("u1").unwrap(),
            CalendarDate::parse("2025-03-10").unwrap(),
        )
        .await;
    let s = report.summary;

    assert_eq!(s.calories.value, 1150.5);
    assert_eq!(s.water.value, 700.0);
    assert_eq!(s.water.target, 2500.0);
    assert_eq!(s.sleep.value, 450.0);
    assert_eq!(s.workouts.count, 2);
    assert_eq!(s.workouts.calories, 80.0);
    assert_eq!(s.workouts.duration, 60);
    for source in [
        report.sources.nutrition,
        report.sources.hydration,
        report.sources.sleep,
        report.sources.workouts,
    ] {
        assert_eq!(source, Source::Fallback);
    }
}
