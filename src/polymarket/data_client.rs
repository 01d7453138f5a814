use reqwest::Client;
use thiserror::Error;

use super::types::ApiTrade;

const DATA_API_BASE: &str = "https://data-api.polymarket.com";

#[derive(Debug, Error)]
pub enum DataClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Thin client for the public Polymarket Data API.
#[derive(Debug, Clone)]
pub struct DataClient {
    http: Client,
    base_url: String,
}

impl DataClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: DATA_API_BASE.into(),
        }
    }

    pub fn with_base_url(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Fetch the most recent trades across the whole platform, newest first.
    pub async fn get_recent_trades(&self, limit: u32) -> Result<Vec<ApiTrade>, DataClientError> {
        let url = format!("{}/trades", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?
            .error_for_status()?;

        let trades: Vec<ApiTrade> = resp.json().await?;
        Ok(trades)
    }
}
