use metrics::{describe_counter, describe_histogram, Unit};
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn describe_metrics() {
    describe_counter!("rebase_pairs_total", "Pairs processed by market rebases");
    describe_counter!("rebase_pairs_unreachable_total", "Pairs with no weighted path to the reference asset");
    describe_counter!("rebase_paths_discovered_total", "Conversion paths found across both directions");
    describe_histogram!("rebase_market_duration_seconds", Unit::Seconds, "Wall time of one market rebase");
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics() -> anyhow::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], 9000))
        .install()?;
    describe_metrics();
    tracing::info!("Prometheus exporter listening on http://0.0.0.0:9000/metrics");
    Ok(())
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics() -> anyhow::Result<()> {
    // no recorder installed, descriptions are dropped
    describe_metrics();
    Ok(())
}
