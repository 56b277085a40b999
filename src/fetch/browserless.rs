//! Script-rendered pages through a Browserless `/content` endpoint.
//!
//! Browserless owns the headless browser; each request navigates, waits for
//! the listing selector (best effort), then waits the settle delay before the
//! rendered HTML is returned.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

use super::{PageFetcher, RenderedPage};

pub struct BrowserlessFetcher {
    client: Client,
    endpoint: String,
    user_agent: String,
    timeout_ms: u64,
    settle_delay_ms: u64,
    viewport: (u32, u32),
    wait_for: Option<String>,
    pages_loaded: usize,
}

impl BrowserlessFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let base = config.browserless_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(AppError::config("fetcher.browserless_url is not set"));
        }
        let mut endpoint = format!("{base}/content");
        if let Some(token) = &config.browserless_token {
            endpoint.push_str(&format!("?token={token}"));
        }

        // Navigation and settle time both happen server side.
        let budget = Duration::from_secs(config.timeout_secs)
            + Duration::from_millis(config.settle_delay_ms)
            + Duration::from_secs(10);
        let client = Client::builder().timeout(budget).build()?;

        Ok(Self {
            client,
            endpoint,
            user_agent: config.user_agent.clone(),
            timeout_ms: config.timeout_secs * 1000,
            settle_delay_ms: config.settle_delay_ms,
            viewport: (config.viewport_width, config.viewport_height),
            wait_for: None,
            pages_loaded: 0,
        })
    }

    /// Wait for this selector before capturing the page.
    pub fn wait_for(mut self, selector: impl Into<String>) -> Self {
        let selector = selector.into();
        self.wait_for = (!selector.trim().is_empty()).then_some(selector);
        self
    }

    fn request_body(&self, url: &str) -> Value {
        let mut body = json!({
            "url": url,
            "userAgent": self.user_agent,
            "viewport": { "width": self.viewport.0, "height": self.viewport.1 },
            "gotoOptions": { "waitUntil": "networkidle2", "timeout": self.timeout_ms },
            "waitForTimeout": self.settle_delay_ms,
            "bestAttempt": true,
        });
        if let Some(selector) = &self.wait_for {
            body["waitForSelector"] = json!({ "selector": selector, "timeout": self.timeout_ms });
        }
        body
    }
}

#[async_trait]
impl PageFetcher for BrowserlessFetcher {
    async fn load(&mut self, url: &str) -> Result<RenderedPage> {
        let body = serde_json::to_vec(&self.request_body(url))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::fetch(
                url,
                format!("Browserless status {status}: {message}"),
            ));
        }

        let html = response.text().await.map_err(|e| AppError::fetch(url, e))?;
        self.pages_loaded += 1;
        Ok(RenderedPage {
            url: url.to_string(),
            html,
        })
    }

    async fn close(&mut self) -> Result<()> {
        log::debug!(
            "Browserless session closed after {} page(s)",
            self.pages_loaded
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FetcherConfig {
        FetcherConfig {
            browserless_url: "http://localhost:3000/".to_string(),
            browserless_token: Some("secret".to_string()),
            ..FetcherConfig::default()
        }
    }

    #[test]
    fn test_requires_base_url() {
        assert!(BrowserlessFetcher::new(&FetcherConfig::default()).is_err());
    }

    #[test]
    fn test_endpoint_with_token() {
        let fetcher = BrowserlessFetcher::new(&config()).unwrap();
        assert_eq!(fetcher.endpoint, "http://localhost:3000/content?token=secret");
    }

    #[test]
    fn test_request_body() {
        let fetcher = BrowserlessFetcher::new(&config())
            .unwrap()
            .wait_for("article.jobTuple, div[data-job-id]");
        let body = fetcher.request_body("https://www.naukri.com/jobs");

        assert_eq!(body["url"], "https://www.naukri.com/jobs");
        assert_eq!(body["viewport"]["width"], 1920);
        assert_eq!(body["viewport"]["height"], 1080);
        assert_eq!(body["waitForTimeout"], 3000);
        assert_eq!(
            body["waitForSelector"]["selector"],
            "article.jobTuple, div[data-job-id]"
        );
    }

    #[test]
    fn test_blank_wait_for_is_ignored() {
        let fetcher = BrowserlessFetcher::new(&config()).unwrap().wait_for("  ");
        assert!(fetcher.request_body("https://x.test").get("waitForSelector").is_none());
    }
}
