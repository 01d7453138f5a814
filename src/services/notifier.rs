use serde_json::json;

use crate::models::AlertPayload;

/// Telegram notification service. Failures are logged but never block the
/// main flow; a dropped delivery is preferred over duplicate spam, so
/// dedup marking happens upstream regardless of the outcome here.
#[derive(Debug, Clone)]
pub struct Notifier {
    http: reqwest::Client,
    bot_token: String,
    chat_ids: Vec<String>,
}

impl Notifier {
    pub fn new(bot_token: String, chat_ids: Vec<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token,
            chat_ids,
        }
    }

    /// Send a Telegram message to every configured chat. Failures are
    /// logged as warnings per chat.
    pub async fn send(&self, message: &str) {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        for chat_id in &self.chat_ids {
            let body = json!({
                "chat_id": chat_id,
                "text": message,
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
            });

            match self.http.post(&url).json(&body).send().await {
                Ok(resp) => {
                    if !resp.status().is_success() {
                        tracing::warn!(
                            status = %resp.status(),
                            chat_id = %chat_id,
                            "Telegram sendMessage returned non-2xx"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, chat_id = %chat_id, "Failed to send Telegram notification");
                }
            }
        }
    }

    pub async fn send_startup_message(&self) {
        self.send("🤖 <b>Polywatch started</b>\n\nMonitoring for suspicious activity...")
            .await;
    }
}

/// Render an [`AlertPayload`] into Telegram HTML. The only place markup
/// exists; the payload itself stays structured.
pub fn format_alert(payload: &AlertPayload) -> String {
    let wallet_short = if payload.wallet_address.len() > 10 {
        format!(
            "{}...{}",
            &payload.wallet_address[..6],
            &payload.wallet_address[payload.wallet_address.len() - 4..]
        )
    } else {
        payload.wallet_address.clone()
    };

    // Char-based truncation; market questions are not always ASCII.
    let question = if payload.market_question.chars().count() > 80 {
        let short: String = payload.market_question.chars().take(80).collect();
        format!("{short}...")
    } else {
        payload.market_question.clone()
    };

    let triggers_text = payload
        .triggers
        .iter()
        .map(|t| format!("  • {} ({})", t.label, t.detail))
        .collect::<Vec<_>>()
        .join("\n");

    let mut message = format!(
        "🚨 <b>{}</b>\n\n\
         <b>Market:</b> {}\n\
         <b>Side:</b> {} | <b>Size:</b> ${} | <b>Price:</b> {}\n\n\
         <b>Wallet:</b> <code>{}</code> ({} trades)\n\
         <b>Score:</b> {}/{}\n\n\
         <b>Triggers:</b>\n{}\n\n",
        payload.title,
        question,
        payload.side,
        payload.size_usd.round_dp(2),
        payload.price.round_dp(2),
        wallet_short,
        payload.wallet_trade_count,
        payload.score,
        payload.max_score,
        triggers_text,
    );

    if let Some(url) = &payload.market_url {
        message.push_str(&format!("🔗 <a href=\"{url}\">View Market</a>\n\n"));
    }

    message.push_str(&format!("⚠️ <i>{}</i>", payload.disclaimer));
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Side, Trigger};
    use rust_decimal::Decimal;

    fn payload() -> AlertPayload {
        AlertPayload {
            title: "Potential Insider-Like Activity".into(),
            market_question: "Will it happen?".into(),
            side: Side::Yes,
            size_usd: Decimal::from(5_000),
            price: Decimal::new(42, 2),
            wallet_address: "0xabcdef0123456789abcdef0123456789abcdef01".into(),
            wallet_trade_count: 2,
            score: 9,
            max_score: 12,
            triggers: vec![Trigger {
                label: "Fresh wallet",
                detail: "2 prior trades".into(),
            }],
            market_url: Some("https://polymarket.com/event/will-it-happen".into()),
            disclaimer: "Anomaly alert only. DYOR.".into(),
        }
    }

    #[test]
    fn test_format_alert_shortens_wallet_and_lists_triggers() {
        let text = format_alert(&payload());
        assert!(text.contains("0xabcd...ef01"));
        assert!(text.contains("Score:</b> 9/12"));
        assert!(text.contains("Fresh wallet (2 prior trades)"));
        assert!(text.contains("View Market"));
    }

    #[test]
    fn test_format_alert_without_url() {
        let mut p = payload();
        p.market_url = None;
        let text = format_alert(&p);
        assert!(!text.contains("View Market"));
    }
}
