use rust_decimal::Decimal;

use crate::models::{MarketProfile, Trade, Trigger, WalletProfile};

/// Detection thresholds and per-signal point weights. Every field maps to a
/// named configuration option; nothing here is hard-coded at call sites.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub min_size_usd: Decimal,
    pub fresh_wallet_max_trades: u64,
    pub market_percentile: u32,
    pub wallet_size_multiplier: Decimal,
    pub concentration_threshold_pct: Decimal,

    pub fresh_wallet_points: u32,
    pub large_size_points: u32,
    pub market_anomaly_points: u32,
    pub wallet_shift_points: u32,
    pub concentration_points: u32,
    pub alert_threshold: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_size_usd: Decimal::from(2_000),
            fresh_wallet_max_trades: 5,
            market_percentile: 95,
            wallet_size_multiplier: Decimal::from(5),
            concentration_threshold_pct: Decimal::from(10),

            fresh_wallet_points: 2,
            large_size_points: 2,
            market_anomaly_points: 2,
            wallet_shift_points: 3,
            concentration_points: 3,
            alert_threshold: 5,
        }
    }
}

impl ScoringConfig {
    /// Highest total a single trade can reach: all five signals firing.
    pub fn max_score(&self) -> u32 {
        self.fresh_wallet_points
            + self.large_size_points
            + self.market_anomaly_points
            + self.wallet_shift_points
            + self.concentration_points
    }
}

/// Scoring output for one trade: the additive total plus one trigger per
/// fired signal, in evaluation order.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub total: u32,
    pub triggers: Vec<Trigger>,
}

impl ScoreBreakdown {
    pub fn should_alert(&self, config: &ScoringConfig) -> bool {
        self.total >= config.alert_threshold
    }
}

/// Score one trade against its wallet and market profiles.
///
/// Signals are independent and additive: each reads its own slice of the
/// inputs and contributes a fixed number of points, which keeps every alert
/// explainable by its trigger list. The profiles must be snapshots taken
/// before the trade was recorded into the stores.
pub fn score_trade(
    trade: &Trade,
    wallet: &WalletProfile,
    market: &MarketProfile,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let mut total = 0u32;
    let mut triggers = Vec::new();

    // 1. Fresh wallet: this trade is the wallet's Nth, fresh while N stays
    //    at or below the configured maximum.
    if wallet.trade_count + 1 <= config.fresh_wallet_max_trades {
        total += config.fresh_wallet_points;
        triggers.push(Trigger {
            label: "Fresh wallet",
            detail: format!("{} prior trades", wallet.trade_count),
        });
    }

    // 2. Large absolute size.
    if trade.size_usd >= config.min_size_usd {
        total += config.large_size_points;
        triggers.push(Trigger {
            label: "Large size",
            detail: format!("${}", trade.size_usd.round_dp(0)),
        });
    }

    // 3. Market size anomaly: at or above the market's percentile of prior
    //    trade sizes. Undefined percentile (sparse market) never fires.
    if let Some(p) = market.percentile_size {
        if p > Decimal::ZERO && trade.size_usd >= p {
            total += config.market_anomaly_points;
            triggers.push(Trigger {
                label: "Market anomaly",
                detail: format!(
                    ">= ${} p{}",
                    p.round_dp(0),
                    config.market_percentile
                ),
            });
        }
    }

    // 4. Wallet behavior shift: a multiple of the wallet's own average.
    //    A first trade has no average and cannot fire this.
    let average = wallet.average_size_usd();
    if average > Decimal::ZERO && trade.size_usd >= config.wallet_size_multiplier * average {
        total += config.wallet_shift_points;
        triggers.push(Trigger {
            label: "Behavior shift",
            detail: format!("{}x wallet average", (trade.size_usd / average).round_dp(1)),
        });
    }

    // 5. High concentration: share of the market's cumulative volume.
    let concentration_pct = market.concentration(trade.size_usd) * Decimal::ONE_HUNDRED;
    if market.cumulative_volume_usd > Decimal::ZERO
        && concentration_pct >= config.concentration_threshold_pct
    {
        total += config.concentration_points;
        triggers.push(Trigger {
            label: "High concentration",
            detail: format!("{}% of market volume", concentration_pct.round_dp(1)),
        });
    }

    ScoreBreakdown { total, triggers }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
