mod common;

use common::{MockProviders, aggregator};
use std::sync::Arc;
use std::time::Duration;

use vitals_client::store::InMemoryRecordStore;
use vitals_client::{HydrationDailySummary, NutritionDailySummary, NutritionTotals};
use vitals_dashboard::{CalendarDate, DashboardError, DashboardService, Source, UserId};

fn service(providers: MockProviders) -> (DashboardService, Arc<MockProviders>) {
    let providers = Arc::new(providers);
    let agg = aggregator(providers.clone(), Arc::new(InMemoryRecordStore::new()));
    (DashboardService::new(Arc::new(agg)), providers)
}

fn nourished(calories: f64) -> MockProviders {
    MockProviders {
        nutrition: Some(NutritionDailySummary {
            total_nutrition: NutritionTotals {
                calories,
                ..Default::default()
            },
            goals: None,
        }),
        hydration: Some(HydrationDailySummary {
            total_consumed: 1000.0,
            target_amount: 2000.0,
        }),
        ..Default::default()
    }
}

fn date() -> CalendarDate {
    CalendarDate::parse("2025-03-10").expect("date")
}

#[tokio::test]
async fn load_without_user_queries_nothing() {
    let (svc, providers) = service(nourished(1200.0));

    let err = svc.load(None, date()).await.unwrap_err();
    assert!(matches!(err, DashboardError::MissingUser));
    assert_eq!(providers.call_count(), 0);
    assert!(svc.latest().await.is_none());
}

#[tokio::test]
async fn load_publishes_snapshot() {
    let (svc, _) = service(nourished(1200.0));
    let user = UserId::new("u1").unwrap();

    let snapshot = svc.load(Some(&user), date()).await.unwrap();
    assert_eq!(snapshot.summary.calories.value, 1200.0);
    assert_eq!(snapshot.sources.nutrition, Source::Primary);
    assert_eq!(snapshot.cards.len(), 4);
    assert_eq!(snapshot.cards[0].value, "1,200 kcal");
    assert_eq!(svc.latest().await, Some(snapshot));
}

#[tokio::test]
async fn background_refresh_publishes() {
    let (svc, _) = service(nourished(900.0));
    let handle = svc
        .start_refresh(UserId::new("u1").unwrap(), date())
        .await;
    assert_eq!(handle.generation(), 1);

    let snapshot = handle.wait().await.expect("published");
    assert_eq!(snapshot.summary.calories.value, 900.0);
    assert_eq!(svc.latest().await, Some(snapshot));
}

#[tokio::test]
async fn cancelled_refresh_never_publishes() {
    let (svc, _) = service(MockProviders {
        delay: Some(Duration::from_millis(300)),
        ..nourished(900.0)
    });

    let handle = svc
        .start_refresh(UserId::new("u1").unwrap(), date())
        .await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.cancel();

    assert!(handle.wait().await.is_none());
    assert!(svc.latest().await.is_none());
}

#[tokio::test]
async fn newer_refresh_supersedes_older() {
    let (svc, _) = service(MockProviders {
        delay: Some(Duration::from_millis(200)),
        ..nourished(900.0)
    });
    let user = UserId::new("u1").unwrap();

    let first = svc.start_refresh(user.clone(), date()).await;
    let second = svc.start_refresh(user, date()).await;
    assert!(second.generation() > first.generation());

    assert!(first.wait().await.is_none());
    let published = second.wait().await.expect("newest refresh publishes");
    assert_eq!(svc.latest().await, Some(published));
}

#[tokio::test]
async fn load_superseded_by_refresh_reports_cancelled() {
    let (svc, _) = service(MockProviders {
        delay: Some(Duration::from_millis(200)),
        ..nourished(900.0)
    });
    let user = UserId::new("u1").unwrap();

    let svc_for_load = svc.clone();
    let user_for_load = user.clone();
    let load = tokio::spawn(async move { svc_for_load.load(Some(&user_for_load), date()).await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    let refresh = svc.start_refresh(user, date()).await;

    let err = load.await.unwrap().unwrap_err();
    assert!(matches!(err, DashboardError::Cancelled));
    assert!(refresh.wait().await.is_some());
}
