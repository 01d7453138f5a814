use std::collections::HashMap;

use chrono::{DateTime, Utc};
use metrics::counter;

use crate::ingestion::normalizer;
use crate::intelligence::{
    score_trade, AlertDeduplicator, MarketVolumeStore, ScoringConfig, WalletHistoryStore,
};
use crate::models::{AlertPayload, Trade};
use crate::polymarket::ApiTrade;
use crate::services::composer;

/// Engine-side knobs the pipeline needs beyond scoring itself.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub scoring: ScoringConfig,
    /// Minimum samples before a market percentile is considered defined.
    pub min_market_observations: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            min_market_observations: 20,
        }
    }
}

/// All mutable engine state, owned by the orchestrator and passed in
/// explicitly so the engine stays testable with injected stores.
#[derive(Debug)]
pub struct DetectionState {
    pub wallets: WalletHistoryStore,
    pub markets: MarketVolumeStore,
    pub dedup: AlertDeduplicator,
    /// Trade ids already run through the pipeline, with last-seen time.
    /// Polling pages overlap; a replayed trade must not be scored again or
    /// double-counted into the stores. Pruned on the same retention window
    /// as the alert records, after which the deduplicator is the safety
    /// net should an id somehow resurface.
    processed: HashMap<String, DateTime<Utc>>,
}

impl DetectionState {
    pub fn new(market_max_samples: usize) -> Self {
        Self {
            wallets: WalletHistoryStore::new(),
            markets: MarketVolumeStore::new(market_max_samples),
            dedup: AlertDeduplicator::new(),
            processed: HashMap::new(),
        }
    }

    /// Drop replay-guard entries and alert records older than `retention`.
    /// The venue's recent-trades page cannot return a trade id that old, so
    /// neither map needs it and both stay bounded. Returns how many entries
    /// were pruned in total.
    pub fn prune(&mut self, now: DateTime<Utc>, retention: chrono::Duration) -> usize {
        let before = self.processed.len();
        self.processed.retain(|_, seen_at| now - *seen_at < retention);
        (before - self.processed.len()) + self.dedup.prune(now, retention)
    }
}

/// Process one fetched batch of raw trades.
///
/// Records are normalized, ordered by event time (the Data API returns
/// newest-first), and fed through the per-trade path one at a time. Nothing
/// a single trade does can abort the rest of the batch. Returns the
/// composed alerts in processing order; dispatch is the caller's job.
pub fn process_batch(
    raw_trades: &[ApiTrade],
    state: &mut DetectionState,
    config: &PipelineConfig,
) -> Vec<AlertPayload> {
    let mut trades: Vec<Trade> = Vec::with_capacity(raw_trades.len());
    for raw in raw_trades {
        match normalizer::normalize(raw) {
            Some(trade) => trades.push(trade),
            None => {
                counter!("trades_dropped_total").increment(1);
                tracing::warn!(
                    tx_hash = raw.transaction_hash.as_deref().unwrap_or("<missing>"),
                    "Dropping malformed trade record"
                );
            }
        }
    }

    // Oldest first, so store updates observe event order.
    trades.sort_by_key(|t| t.timestamp);

    let mut alerts = Vec::new();
    for trade in &trades {
        if let Some(alert) = process_trade(trade, state, config) {
            alerts.push(alert);
        }
    }
    alerts
}

/// Run one trade through the engine: observe → score → dedup → compose →
/// update. The stores are snapshotted before scoring and recorded into
/// after, so a trade never counts toward its own statistics.
pub fn process_trade(
    trade: &Trade,
    state: &mut DetectionState,
    config: &PipelineConfig,
) -> Option<AlertPayload> {
    if state
        .processed
        .insert(trade.trade_id.clone(), Utc::now())
        .is_some()
    {
        tracing::debug!(trade_id = %trade.trade_id, "Trade already processed, skipping");
        return None;
    }

    counter!("trades_processed_total").increment(1);

    let wallet = state.wallets.snapshot(&trade.wallet_address);
    let market = state.markets.snapshot(
        &trade.market_id,
        config.scoring.market_percentile,
        config.min_market_observations,
    );

    let breakdown = score_trade(trade, &wallet, &market, &config.scoring);

    let alert = if breakdown.should_alert(&config.scoring) {
        if state.dedup.should_alert(&trade.trade_id) {
            state.dedup.mark_alerted(&trade.trade_id, Utc::now());

            tracing::info!(
                wallet = %trade.wallet_address,
                market = %trade.market_id,
                score = breakdown.total,
                triggers = breakdown.triggers.len(),
                "Suspicious trade detected"
            );

            Some(composer::compose(
                trade,
                &wallet,
                breakdown,
                config.scoring.max_score(),
            ))
        } else {
            counter!("alerts_suppressed_total").increment(1);
            tracing::debug!(trade_id = %trade.trade_id, "Alert already sent, suppressing");
            None
        }
    } else {
        None
    };

    // Update rolling statistics only after scoring.
    state.wallets.record(&trade.wallet_address, trade.size_usd);
    state.markets.record(&trade.market_id, trade.size_usd);

    alert
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;
    use rust_decimal::Decimal;

    fn make_trade(id: &str, wallet: &str, size: i64) -> Trade {
        Trade {
            trade_id: id.into(),
            market_id: "0xmarket".into(),
            wallet_address: wallet.into(),
            side: Side::Yes,
            size_usd: Decimal::from(size),
            price: Decimal::new(50, 2),
            timestamp: Utc::now(),
            market_question: "Question?".into(),
            market_slug: "question".into(),
        }
    }

    #[test]
    fn test_trade_alerts_at_most_once() {
        let mut state = DetectionState::new(10_000);
        // Fresh wallet (+2) and large size (+2) are all an empty market can
        // contribute; lower the threshold so they alone alert.
        let mut config = PipelineConfig::default();
        config.scoring.alert_threshold = 4;

        let trade = make_trade("0xtx_repeat", "0xwallet", 5_000);

        let first = process_trade(&trade, &mut state, &config);
        assert!(first.is_some(), "first pass should alert");

        let second = process_trade(&trade, &mut state, &config);
        assert!(second.is_none(), "replay must not alert again");
    }

    #[test]
    fn test_replay_does_not_double_count_stores() {
        let mut state = DetectionState::new(10_000);
        let config = PipelineConfig::default();

        let trade = make_trade("0xtx1", "0xwallet", 1_000);
        process_trade(&trade, &mut state, &config);
        process_trade(&trade, &mut state, &config);

        assert_eq!(state.wallets.snapshot("0xwallet").trade_count, 1);
    }

    #[test]
    fn test_replay_guard_is_pruned_with_alert_records() {
        let mut state = DetectionState::new(10_000);
        let mut config = PipelineConfig::default();
        config.scoring.alert_threshold = 4;

        let trade = make_trade("0xtx_prune", "0xwallet", 5_000);
        process_trade(&trade, &mut state, &config).expect("should alert");
        assert_eq!(state.processed.len(), 1);
        assert_eq!(state.dedup.len(), 1);

        // Inside the retention window nothing is dropped.
        let pruned = state.prune(Utc::now(), chrono::Duration::hours(24));
        assert_eq!(pruned, 0);

        // Past the window both the replay guard and the alert record go;
        // the venue can no longer return this trade id.
        let later = Utc::now() + chrono::Duration::hours(25);
        let pruned = state.prune(later, chrono::Duration::hours(24));
        assert_eq!(pruned, 2);
        assert!(state.processed.is_empty());
        assert!(state.dedup.is_empty());
    }

    #[test]
    fn test_dedup_suppresses_when_replay_guard_misses() {
        // A trade id can re-enter scoring after its replay-guard entry was
        // pruned; the deduplicator must still prevent a second alert.
        let mut state = DetectionState::new(10_000);
        let mut config = PipelineConfig::default();
        config.scoring.alert_threshold = 4;

        state.dedup.mark_alerted("0xtx_seen", Utc::now());

        let alert = process_trade(
            &make_trade("0xtx_seen", "0xwallet", 5_000),
            &mut state,
            &config,
        );
        assert!(alert.is_none(), "dedup must suppress the alert");
        // The trade still updates rolling statistics.
        assert_eq!(state.wallets.snapshot("0xwallet").trade_count, 1);
    }

    #[test]
    fn test_current_trade_excluded_from_own_profile() {
        let mut state = DetectionState::new(10_000);
        let config = PipelineConfig::default();

        // Two prior small trades set the wallet average at $100.
        process_trade(&make_trade("0xtx1", "0xwallet", 100), &mut state, &config);
        process_trade(&make_trade("0xtx2", "0xwallet", 100), &mut state, &config);

        // The $5,000 trade is scored against average $100, not an average
        // that includes itself: behavior shift fires.
        let alert = process_trade(&make_trade("0xtx3", "0xwallet", 5_000), &mut state, &config)
            .expect("should alert");
        assert!(alert.triggers.iter().any(|t| t.label == "Behavior shift"));
        assert_eq!(alert.wallet_trade_count, 2);
    }
}
