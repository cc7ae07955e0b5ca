//! Logging setup and metric names.

use crate::domains::{Domain, Source};

pub const SOURCE_TOTAL: &str = "vitals_source_total";

/// Install the global `tracing` subscriber. The filter comes from
/// `VITALS_LOG_LEVEL`, then `RUST_LOG`, then `info`.
pub fn init_tracing() -> String {
    let log_env = std::env::var("VITALS_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    log_env
}

pub fn describe_metrics() {
    metrics::describe_counter!(
        SOURCE_TOTAL,
        "Daily summary domains by the tier that produced their figures"
    );
}

pub fn record_source(domain: Domain, source: Source) {
    metrics::counter!(SOURCE_TOTAL, "domain" => domain.as_str(), "source" => source.as_str())
        .increment(1);
}
