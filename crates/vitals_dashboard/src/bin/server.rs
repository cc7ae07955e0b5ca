use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use vitals_client::config::Config;
use vitals_dashboard::routes::{self, AppState};
use vitals_dashboard::{AggregatorOptions, ServerOptions, DailyStatsAggregator, SummaryProviders, observability};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let log_env = observability::init_tracing();
    tracing::info!(%log_env, "vitals_dashboard:http: log filter");

    let handle = PrometheusBuilder::new().install_recorder()?;
    observability::describe_metrics();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "missing configuration; aborting startup");
            std::process::exit(1);
        }
    };
    let options = AggregatorOptions::from_env()?;
    let aggregator = DailyStatsAggregator::new(
        SummaryProviders::from_client(Arc::new(cfg.summary_client())),
        Arc::new(cfg.record_store()),
        options,
    );
    let state = Arc::new(AppState {
        aggregator: Arc::new(aggregator),
        metrics: Some(handle),
    });

    let ServerOptions {
        address: addr,
        request_timeout,
    } = ServerOptions::from_env()?;
    let app = routes::router(state, request_timeout);
    info!(%addr, ?request_timeout, "starting HTTP server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {addr}: {e}");
            std::process::exit(1);
        }
    };

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to install ctrl+c handler: {e}");
            }
        })
        .await?;

    Ok(())
}
