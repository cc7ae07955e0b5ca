use std::sync::Arc;

use vitals_client::config::Config;
use vitals_dashboard::{
    AggregatorOptions, CalendarDate, DailyStatsAggregator, DashboardService, SummaryProviders,
    UserId, observability,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let log_env = observability::init_tracing();
    tracing::info!(%log_env, "vitals_dashboard: log filter");

    let mut args = std::env::args().skip(1);
    let user = match args.next().map(UserId::new).transpose()? {
        Some(u) => u,
        None => {
            eprintln!("usage: vitals_dashboard <user-id> [YYYY-MM-DD]");
            std::process::exit(2);
        }
    };

    let options = AggregatorOptions::from_env()?;
    let date = match args.next() {
        Some(raw) => CalendarDate::parse(&raw)?,
        None => CalendarDate::today_in(options.zone),
    };

    let cfg = Config::from_env()?;
    let aggregator = DailyStatsAggregator::new(
        SummaryProviders::from_client(Arc::new(cfg.summary_client())),
        Arc::new(cfg.record_store()),
        options,
    );
    let service = DashboardService::new(Arc::new(aggregator));

    let snapshot = service.load(Some(&user), date).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
