use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// A single canonical fill, produced by the normalizer.
///
/// `trade_id` is the venue transaction hash and is stable across polling
/// cycles, which is what makes alert deduplication possible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub market_id: String,
    pub wallet_address: String,
    pub side: Side,
    pub size_usd: Decimal,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub market_question: String,
    pub market_slug: String,
}
