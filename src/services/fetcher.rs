// src/services/fetcher.rs

//! Document fetcher.
//!
//! Retrieves source pages with a fixed identity header and a bounded
//! per-request timeout. No retries: callers decide whether a failure is
//! fatal (listing, hours) or degradable (one concept's detail page).

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// HTTP fetcher for source documents.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher from crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a document body as text.
    ///
    /// Response statuses outside {200, 301, 302} are rejected.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();

        if !matches!(status, 200 | 301 | 302) {
            return Err(AppError::fetch_status(url, status));
        }

        Ok(response.text().await?)
    }
}
