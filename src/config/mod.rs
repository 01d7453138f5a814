use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::Context;
use rust_decimal::Decimal;

use crate::ingestion::pipeline::PipelineConfig;
use crate::intelligence::ScoringConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub poll_interval_secs: u64,
    pub fetch_limit: u32,
    pub market_max_samples: usize,
    pub alert_retention_hours: i64,
    pub pipeline: PipelineConfig,

    // Observability (optional — metrics listener disabled when unset)
    pub metrics_port: Option<u16>,

    // Telegram credentials (optional — log-only mode without them)
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_ids: Vec<String>,

    pub data_api_url: Option<String>,
}

impl AppConfig {
    /// Read every option from the environment. Missing options fall back to
    /// their defaults; present-but-invalid values are fatal, per the rule
    /// that a misconfigured process must not start.
    pub fn from_env() -> anyhow::Result<Self> {
        let scoring = ScoringConfig {
            min_size_usd: env_or("MIN_SIZE_USD", Decimal::from(2_000))?,
            fresh_wallet_max_trades: env_or("FRESH_WALLET_MAX_TRADES", 5)?,
            market_percentile: env_or("MARKET_PERCENTILE", 95)?,
            wallet_size_multiplier: env_or("WALLET_SIZE_MULTIPLIER", Decimal::from(5))?,
            concentration_threshold_pct: env_or(
                "CONCENTRATION_THRESHOLD_PCT",
                Decimal::from(10),
            )?,

            fresh_wallet_points: env_or("FRESH_WALLET_POINTS", 2)?,
            large_size_points: env_or("LARGE_SIZE_POINTS", 2)?,
            market_anomaly_points: env_or("MARKET_ANOMALY_POINTS", 2)?,
            wallet_shift_points: env_or("WALLET_SHIFT_POINTS", 3)?,
            concentration_points: env_or("CONCENTRATION_POINTS", 3)?,
            alert_threshold: env_or("ALERT_THRESHOLD", 5)?,
        };

        if scoring.market_percentile == 0 || scoring.market_percentile > 100 {
            anyhow::bail!(
                "MARKET_PERCENTILE must be in 1..=100, got {}",
                scoring.market_percentile
            );
        }

        let chat_ids_raw = env::var("TELEGRAM_CHAT_IDS").unwrap_or_default();
        let telegram_chat_ids: Vec<String> = chat_ids_raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            poll_interval_secs: env_or("POLL_INTERVAL_SECS", 60)?,
            fetch_limit: env_or("FETCH_LIMIT", 200)?,
            market_max_samples: env_or("MARKET_MAX_SAMPLES", 10_000)?,
            alert_retention_hours: env_or("ALERT_RETENTION_HOURS", 24)?,
            pipeline: PipelineConfig {
                scoring,
                min_market_observations: env_or("MIN_MARKET_OBSERVATIONS", 20)?,
            },
            metrics_port: env_opt("METRICS_PORT")?,
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
            telegram_chat_ids,
            data_api_url: env::var("DATA_API_URL").ok(),
        })
    }

    /// Returns true if Telegram delivery is fully configured.
    pub fn has_telegram(&self) -> bool {
        self.telegram_bot_token.is_some() && !self.telegram_chat_ids.is_empty()
    }
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {name}={raw}: {e}")),
        Err(_) => Ok(default),
    }
}

fn env_opt<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display + Send + Sync + std::error::Error + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .with_context(|| format!("invalid {name}={raw}")),
        Err(_) => Ok(None),
    }
}
