use crate::intelligence::ScoreBreakdown;
use crate::models::{AlertPayload, Trade, WalletProfile};

const ALERT_TITLE: &str = "Potential Insider-Like Activity";
const DISCLAIMER: &str = "Anomaly alert only. DYOR.";

/// Build the structured alert record for a triggered trade.
///
/// Pure function: no I/O and no markup. `wallet` must be the pre-trade
/// snapshot used for scoring, so the reported trade count matches what the
/// triggers describe.
pub fn compose(
    trade: &Trade,
    wallet: &WalletProfile,
    breakdown: ScoreBreakdown,
    max_score: u32,
) -> AlertPayload {
    let market_url = if trade.market_slug.is_empty() {
        None
    } else {
        Some(format!("https://polymarket.com/event/{}", trade.market_slug))
    };

    AlertPayload {
        title: ALERT_TITLE.into(),
        market_question: trade.market_question.clone(),
        side: trade.side,
        size_usd: trade.size_usd,
        price: trade.price,
        wallet_address: trade.wallet_address.clone(),
        wallet_trade_count: wallet.trade_count,
        score: breakdown.total,
        max_score,
        triggers: breakdown.triggers,
        market_url,
        disclaimer: DISCLAIMER.into(),
    }
}
