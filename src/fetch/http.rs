// src/fetch/http.rs

//! Plain HTTP page fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

use super::{PageFetcher, RenderedPage};

/// Fetches raw server-rendered HTML with a configured client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn load(&mut self, url: &str) -> Result<RenderedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(url, format!("HTTP status {status}")));
        }

        let html = response.text().await.map_err(|e| AppError::fetch(url, e))?;
        Ok(RenderedPage {
            url: url.to_string(),
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        assert!(HttpFetcher::new(&FetcherConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_fetch_error() {
        let mut fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();
        let err = fetcher.load("not a url").await.unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
    }
}
