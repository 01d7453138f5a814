use std::time::{Duration, Instant};

use chrono::Utc;
use metrics::{counter, gauge, histogram};
use tokio::time::sleep;

use crate::config::AppConfig;
use crate::ingestion::pipeline::{process_batch, DetectionState};
use crate::models::AlertPayload;
use crate::polymarket::DataClient;
use crate::services::notifier::{format_alert, Notifier};

/// Polling orchestrator: fetch → normalize → score → dedup → compose →
/// dispatch, once per interval, forever.
///
/// One cycle at a time; trades within a cycle are processed sequentially,
/// so the observe-then-score-then-update ordering never races. A fetch
/// failure skips the cycle and the next interval retries; the deduplicator
/// absorbs any page overlap between cycles.
pub async fn run_poller(client: DataClient, notifier: Option<Notifier>, config: AppConfig) {
    tracing::info!(
        interval_secs = config.poll_interval_secs,
        fetch_limit = config.fetch_limit,
        "Trade poller started"
    );

    let mut state = DetectionState::new(config.market_max_samples);

    loop {
        run_cycle(&client, notifier.as_ref(), &mut state, &config).await;
        sleep(Duration::from_secs(config.poll_interval_secs)).await;
    }
}

async fn run_cycle(
    client: &DataClient,
    notifier: Option<&Notifier>,
    state: &mut DetectionState,
    config: &AppConfig,
) {
    let start = Instant::now();

    let raw_trades = match client.get_recent_trades(config.fetch_limit).await {
        Ok(t) => t,
        Err(e) => {
            counter!("fetch_failures_total").increment(1);
            tracing::error!(error = %e, "Failed to fetch recent trades, skipping cycle");
            return;
        }
    };

    counter!("trades_fetched_total").increment(raw_trades.len() as u64);

    let alerts = process_batch(&raw_trades, state, &config.pipeline);
    let sent = dispatch_alerts(notifier, &alerts).await;

    let pruned = state.prune(
        Utc::now(),
        chrono::Duration::hours(config.alert_retention_hours),
    );
    if pruned > 0 {
        tracing::debug!(pruned = pruned, "Pruned expired replay-guard and alert records");
    }

    gauge!("tracked_wallets").set(state.wallets.len() as f64);
    gauge!("tracked_markets").set(state.markets.len() as f64);
    histogram!("poll_cycle_seconds").record(start.elapsed().as_secs_f64());

    tracing::info!(
        fetched = raw_trades.len(),
        alerts = alerts.len(),
        delivered = sent,
        wallets = state.wallets.len(),
        markets = state.markets.len(),
        "Poll cycle complete"
    );
}

/// Hand composed alerts to the notifier. In log-only mode (no Telegram
/// configured) alerts are logged and nothing counts as sent; the
/// `alerts_sent_total` counter tracks delivery attempts only. Returns the
/// number of attempted deliveries.
async fn dispatch_alerts(notifier: Option<&Notifier>, alerts: &[AlertPayload]) -> usize {
    let mut sent = 0usize;
    for alert in alerts {
        match notifier {
            Some(n) => {
                n.send(&format_alert(alert)).await;
                sent += 1;
            }
            None => tracing::info!(
                wallet = %alert.wallet_address,
                score = alert.score,
                max_score = alert.max_score,
                "Alert (log-only mode, no Telegram configured)"
            ),
        }
    }
    counter!("alerts_sent_total").increment(sent as u64);
    sent
}
