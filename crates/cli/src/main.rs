//! Store runner entry point.

use storectl::config::Config;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = match metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "metrics recorder unavailable");
            None
        }
    };

    // 3. Sync and report
    let report = match storectl::run(&config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "store run failed");
            std::process::exit(1);
        }
    };

    match report.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "failed to render report");
            std::process::exit(1);
        }
    }

    if config.print_metrics
        && let Some(handle) = metrics_handle
    {
        println!("{}", handle.render());
    }
}
