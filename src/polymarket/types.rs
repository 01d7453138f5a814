use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Trade (Data API — REST)
// ---------------------------------------------------------------------------

/// Raw trade record from the public Data API `/trades` endpoint.
///
/// Every field is optional: the venue controls this schema and the
/// normalizer decides what is usable. `timestamp` arrives as unix seconds,
/// unix millis, or an RFC 3339 string depending on endpoint version, so it
/// is kept as raw JSON until normalization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTrade {
    pub transaction_hash: Option<String>,
    pub condition_id: Option<String>,
    pub proxy_wallet: Option<String>,
    pub side: Option<String>,
    pub outcome: Option<String>,
    pub size: Option<Decimal>,
    pub price: Option<Decimal>,
    pub timestamp: Option<serde_json::Value>,
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(default)]
    pub event_slug: Option<String>,
}
