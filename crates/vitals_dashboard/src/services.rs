use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::aggregator::{DailyStatsAggregator, SourceReport, SummaryReport};
use crate::cards::{self, DashboardCard};
use crate::error::{DashboardError, DashboardResult};
use crate::types::{CalendarDate, DailySummary, UserId};

/// Everything the dashboard screen renders for one user and day.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub user_id: UserId,
    pub date: CalendarDate,
    pub summary: DailySummary,
    pub sources: SourceReport,
    pub cards: Vec<DashboardCard>,
}

impl DashboardSnapshot {
    pub fn from_report(user_id: UserId, date: CalendarDate, report: SummaryReport) -> Self {
        Self {
            cards: cards::cards(&report.summary),
            user_id,
            date,
            summary: report.summary,
            sources: report.sources,
        }
    }
}

/// Runs aggregations for the dashboard and keeps the newest published
/// snapshot. Only the most recently started load may publish.
#[derive(Clone)]
pub struct DashboardService {
    aggregator: Arc<DailyStatsAggregator>,
    latest: Arc<Mutex<Option<DashboardSnapshot>>>,
    in_flight: Arc<Mutex<Option<Arc<watch::Sender<bool>>>>>,
    generation: Arc<AtomicU64>,
}

pub struct RefreshHandle {
    generation: u64,
    cancel_tx: Arc<watch::Sender<bool>>,
    join: JoinHandle<Option<DashboardSnapshot>>,
}

impl RefreshHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// The published snapshot, or `None` if this refresh was cancelled or
    /// superseded.
    pub async fn wait(self) -> Option<DashboardSnapshot> {
        match self.join.await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(generation = self.generation, error = %e, "refresh task failed");
                None
            }
        }
    }
}

impl DashboardService {
    pub fn new(aggregator: Arc<DailyStatsAggregator>) -> Self {
        Self {
            aggregator,
            latest: Arc::new(Mutex::new(None)),
            in_flight: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn aggregator(&self) -> &DailyStatsAggregator {
        &self.aggregator
    }

    /// Aggregate and publish in the caller's task. Without a signed-in user
    /// nothing is queried.
    pub async fn load(
        &self,
        user: Option<&UserId>,
        date: CalendarDate,
    ) -> DashboardResult<DashboardSnapshot> {
        let user = user.ok_or(DashboardError::MissingUser)?;
        let (generation, _cancel_tx, cancel_rx) = self.begin().await;
        let report = self
            .aggregator
            .compute_report_until_cancelled(user, date, cancel_rx.clone())
            .await
            .ok_or(DashboardError::Cancelled)?;
        let snapshot = DashboardSnapshot::from_report(user.clone(), date, report);
        if !self.publish(generation, &cancel_rx, snapshot.clone()).await {
            return Err(DashboardError::Cancelled);
        }
        Ok(snapshot)
    }

    /// Aggregate on a background task. Starting a refresh cancels the one
    /// before it.
    pub async fn start_refresh(&self, user: UserId, date: CalendarDate) -> RefreshHandle {
        let (generation, cancel_tx, cancel_rx) = self.begin().await;

        let svc = self.clone();
        let join = tokio::spawn(async move {
            let report = svc
                .aggregator
                .compute_report_until_cancelled(&user, date, cancel_rx.clone())
                .await?;
            let snapshot = DashboardSnapshot::from_report(user, date, report);
            svc.publish(generation, &cancel_rx, snapshot.clone())
                .await
                .then_some(snapshot)
        });

        RefreshHandle {
            generation,
            cancel_tx,
            join,
        }
    }

    pub async fn latest(&self) -> Option<DashboardSnapshot> {
        self.latest.lock().await.clone()
    }

    /// Claim a new generation and cancel whatever was running.
    async fn begin(&self) -> (u64, Arc<watch::Sender<bool>>, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        let tx = Arc::new(tx);
        let mut in_flight = self.in_flight.lock().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = in_flight.replace(tx.clone()) {
            let _ = previous.send(true);
        }
        (generation, tx, rx)
    }

    async fn publish(
        &self,
        generation: u64,
        cancel_rx: &watch::Receiver<bool>,
        snapshot: DashboardSnapshot,
    ) -> bool {
        let mut latest = self.latest.lock().await;
        if *cancel_rx.borrow() || self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "dropping stale dashboard snapshot");
            return false;
        }
        *latest = Some(snapshot);
        true
    }
}
