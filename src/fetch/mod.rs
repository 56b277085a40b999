//! Page loading backends.
//!
//! The scrape driver only sees the `PageFetcher` trait. Backends:
//! - `HttpFetcher`: plain GET, for boards that render listings server side
//! - `BrowserlessFetcher`: script-rendered HTML from a Browserless instance

pub mod browserless;
pub mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FetchBackend, FetcherConfig, SourceAdapter};

pub use browserless::BrowserlessFetcher;
pub use http::HttpFetcher;

/// HTML of a loaded result page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL that was requested
    pub url: String,
    pub html: String,
}

/// Loads result pages for the scrape driver.
///
/// A fetcher is owned by one scrape for its whole duration; the driver calls
/// `close` exactly once when the scrape ends, whatever the reason.
#[async_trait]
pub trait PageFetcher: Send {
    /// Load a page, failing with `AppError::Fetch` on navigation errors or timeouts.
    async fn load(&mut self, url: &str) -> Result<RenderedPage>;

    /// Release the underlying session.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl PageFetcher for Box<dyn PageFetcher> {
    async fn load(&mut self, url: &str) -> Result<RenderedPage> {
        (**self).load(url).await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}

/// Build the configured fetcher for an adapter.
pub fn create_fetcher(
    config: &FetcherConfig,
    adapter: &SourceAdapter,
) -> Result<Box<dyn PageFetcher>> {
    Ok(match config.backend {
        FetchBackend::Http => Box::new(HttpFetcher::new(config)?),
        FetchBackend::Browserless => {
            let wait_for = config.wait_for_selector.clone().unwrap_or_else(|| {
                adapter
                    .items
                    .iter()
                    .map(|l| l.selector.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            });
            Box::new(BrowserlessFetcher::new(config)?.wait_for(wait_for))
        }
    })
}
