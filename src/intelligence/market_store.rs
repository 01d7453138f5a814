use std::collections::{HashMap, VecDeque};

use rust_decimal::Decimal;

use crate::models::MarketProfile;

/// Per-market size distribution used for the percentile signal.
///
/// The sample buffer is bounded: past `max_samples` the oldest observation
/// is evicted, so long-running markets keep a trailing window rather than
/// unbounded history. `cumulative_volume_usd` covers every recorded trade
/// regardless of eviction.
#[derive(Debug)]
struct MarketStats {
    trade_sizes: VecDeque<Decimal>,
    cumulative_volume_usd: Decimal,
    total_trades: usize,
}

/// In-memory rolling trade-size distribution per market.
///
/// Same ordering contract as the wallet store: `snapshot` before scoring,
/// `record` after, so percentile and concentration only ever see trades
/// observed before the one being scored.
#[derive(Debug)]
pub struct MarketVolumeStore {
    markets: HashMap<String, MarketStats>,
    max_samples: usize,
}

impl MarketVolumeStore {
    pub fn new(max_samples: usize) -> Self {
        Self {
            markets: HashMap::new(),
            max_samples: max_samples.max(1),
        }
    }

    /// Point-in-time profile of a market. `percentile_size` is `None` when
    /// fewer than `min_observations` samples exist, so percentile-based
    /// signals do not fire on sparse markets.
    pub fn snapshot(
        &self,
        market_id: &str,
        percentile: u32,
        min_observations: usize,
    ) -> MarketProfile {
        let Some(stats) = self.markets.get(market_id) else {
            return MarketProfile::default();
        };

        let percentile_size = if stats.trade_sizes.len() >= min_observations.max(1) {
            Some(nearest_rank_percentile(&stats.trade_sizes, percentile))
        } else {
            None
        };

        MarketProfile {
            trade_count: stats.total_trades,
            cumulative_volume_usd: stats.cumulative_volume_usd,
            percentile_size,
        }
    }

    pub fn record(&mut self, market_id: &str, size_usd: Decimal) {
        let stats = self
            .markets
            .entry(market_id.to_string())
            .or_insert_with(|| MarketStats {
                trade_sizes: VecDeque::new(),
                cumulative_volume_usd: Decimal::ZERO,
                total_trades: 0,
            });

        if stats.trade_sizes.len() == self.max_samples {
            stats.trade_sizes.pop_front();
        }
        stats.trade_sizes.push_back(size_usd);
        stats.cumulative_volume_usd += size_usd;
        stats.total_trades += 1;
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

/// Nearest-rank percentile over an unsorted sample buffer. A full sort per
/// call is fine at the bounded buffer size; a streaming quantile sketch can
/// replace this behind the same `snapshot` contract if it ever matters.
fn nearest_rank_percentile(samples: &VecDeque<Decimal>, percentile: u32) -> Decimal {
    debug_assert!(!samples.is_empty());

    let mut sorted: Vec<Decimal> = samples.iter().copied().collect();
    sorted.sort_unstable();

    let n = sorted.len();
    // rank = ceil(p/100 * n), clamped to [1, n]
    let rank = (percentile as usize * n).div_ceil(100).clamp(1, n);
    sorted[rank - 1]
}
