use rust_decimal::Decimal;
use serde::Serialize;

use super::Side;

/// One fired detection signal, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trigger {
    pub label: &'static str,
    pub detail: String,
}

/// Structured alert record handed to the notifier. Contains no markup;
/// rendering into Telegram formatting is the notifier's concern.
#[derive(Debug, Clone, Serialize)]
pub struct AlertPayload {
    pub title: String,
    pub market_question: String,
    pub side: Side,
    pub size_usd: Decimal,
    pub price: Decimal,
    pub wallet_address: String,
    pub wallet_trade_count: u64,
    pub score: u32,
    pub max_score: u32,
    pub triggers: Vec<Trigger>,
    pub market_url: Option<String>,
    pub disclaimer: String,
}
