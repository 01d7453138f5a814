use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WalletProfile
// ---------------------------------------------------------------------------

/// Rolling per-wallet trade statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletProfile {
    pub trade_count: u64,
    pub total_size_usd: Decimal,
}

impl WalletProfile {
    /// Average observed trade size; `ZERO` before any trade has been
    /// recorded, so a wallet's first trade contributes no behavior-shift
    /// signal.
    pub fn average_size_usd(&self) -> Decimal {
        if self.trade_count == 0 {
            return Decimal::ZERO;
        }
        self.total_size_usd / Decimal::from(self.trade_count)
    }
}

// ---------------------------------------------------------------------------
// MarketProfile
// ---------------------------------------------------------------------------

/// Point-in-time view of a market's size distribution, taken *before* the
/// trade under scoring is recorded. A trade is never compared against itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketProfile {
    pub trade_count: usize,
    pub cumulative_volume_usd: Decimal,
    /// Configured percentile of previously observed trade sizes. `None` when
    /// the market has fewer samples than the configured minimum, in which
    /// case the percentile-based signal must not fire.
    pub percentile_size: Option<Decimal>,
}

impl MarketProfile {
    /// Share of the market's cumulative volume a trade of `size_usd` would
    /// represent, as a ratio. `ZERO` when no volume has been observed.
    pub fn concentration(&self, size_usd: Decimal) -> Decimal {
        if self.cumulative_volume_usd <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        size_usd / self.cumulative_volume_usd
    }
}
