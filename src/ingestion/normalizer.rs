use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Side, Trade};
use crate::polymarket::ApiTrade;

/// Convert a raw venue record into a canonical [`Trade`].
///
/// Returns `None` for malformed records: missing transaction hash, wallet,
/// or market id; non-positive size; price outside (0, 1); or an
/// unparseable timestamp. Callers log and count the drop; a bad record
/// never interrupts the rest of the batch.
pub fn normalize(raw: &ApiTrade) -> Option<Trade> {
    let trade_id = non_empty(raw.transaction_hash.as_deref())?;
    let market_id = non_empty(raw.condition_id.as_deref())?;
    let wallet_address = non_empty(raw.proxy_wallet.as_deref())?.to_lowercase();

    let size_usd = raw.size?;
    if size_usd <= Decimal::ZERO {
        return None;
    }

    let price = raw.price?;
    if price <= Decimal::ZERO || price >= Decimal::ONE {
        return None;
    }

    let side = Side::from_api_str(raw.outcome.as_deref().unwrap_or("Yes"))?;
    let timestamp = parse_timestamp(raw.timestamp.as_ref())?;

    Some(Trade {
        trade_id: trade_id.to_string(),
        market_id: market_id.to_string(),
        wallet_address,
        side,
        size_usd,
        price,
        timestamp,
        market_question: raw.title.clone().unwrap_or_default(),
        market_slug: raw
            .event_slug
            .clone()
            .or_else(|| raw.slug.clone())
            .unwrap_or_default(),
    })
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// The Data API reports timestamps as unix seconds, unix millis, or an
/// RFC 3339 string depending on endpoint version.
fn parse_timestamp(ts: Option<&serde_json::Value>) -> Option<DateTime<Utc>> {
    ts.and_then(|t| match t {
        serde_json::Value::Number(n) => {
            let secs = n.as_i64()?;
            // If >1e12, it's milliseconds
            if secs > 1_000_000_000_000 {
                DateTime::from_timestamp(secs / 1000, ((secs % 1000) * 1_000_000) as u32)
            } else {
                DateTime::from_timestamp(secs, 0)
            }
        }
        serde_json::Value::String(s) => {
            if let Ok(secs) = s.parse::<i64>() {
                if secs > 1_000_000_000_000 {
                    return DateTime::from_timestamp(
                        secs / 1000,
                        ((secs % 1000) * 1_000_000) as u32,
                    );
                }
                return DateTime::from_timestamp(secs, 0);
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
