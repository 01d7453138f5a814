use polywatch::config::AppConfig;
use polywatch::metrics::init_metrics;
use polywatch::polymarket::DataClient;
use polywatch::services::notifier::Notifier;
use polywatch::services::poller::run_poller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    if let Some(port) = config.metrics_port {
        init_metrics(port)?;
        tracing::info!(port = port, "Prometheus metrics listener started");
    }

    let http = reqwest::Client::new();
    let client = match &config.data_api_url {
        Some(url) => DataClient::with_base_url(http, url.clone()),
        None => DataClient::new(http),
    };

    let notifier = if config.has_telegram() {
        let n = Notifier::new(
            config.telegram_bot_token.clone().unwrap_or_default(),
            config.telegram_chat_ids.clone(),
        );
        n.send_startup_message().await;
        tracing::info!(
            chat_count = config.telegram_chat_ids.len(),
            "Telegram notifier configured"
        );
        Some(n)
    } else {
        tracing::warn!("TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_IDS not set — running in log-only mode");
        None
    };

    tokio::select! {
        _ = run_poller(client, notifier, config) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping");
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
