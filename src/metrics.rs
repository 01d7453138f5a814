use std::net::{Ipv4Addr, SocketAddr};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own scrape listener and
/// pre-register all application metrics so they appear before the first
/// increment.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    counter!("trades_fetched_total").absolute(0);
    counter!("trades_processed_total").absolute(0);
    counter!("trades_dropped_total").absolute(0);
    counter!("alerts_sent_total").absolute(0);
    counter!("alerts_suppressed_total").absolute(0);
    counter!("fetch_failures_total").absolute(0);

    gauge!("tracked_wallets").set(0.0);
    gauge!("tracked_markets").set(0.0);

    // Histogram is lazily created on first record; force creation.
    histogram!("poll_cycle_seconds").record(0.0);

    Ok(())
}
