//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::CompiledAdapter;

use super::adapter::SourceAdapter;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Page loading settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Output and pagination bounds
    #[serde(default)]
    pub limits: ScrapeLimits,

    /// Extra boards, or overrides of the built-in ones by name
    #[serde(default)]
    pub adapters: Vec<SourceAdapter>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Built-in adapters with configured ones layered on top.
    pub fn all_adapters(&self) -> Vec<SourceAdapter> {
        let mut adapters = SourceAdapter::builtin();
        for custom in &self.adapters {
            match adapters
                .iter_mut()
                .find(|a| a.name.eq_ignore_ascii_case(&custom.name))
            {
                Some(existing) => *existing = custom.clone(),
                None => adapters.push(custom.clone()),
            }
        }
        adapters
    }

    /// Look up an adapter by board name (case-insensitive).
    pub fn adapter(&self, name: &str) -> Result<SourceAdapter> {
        self.all_adapters()
            .into_iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| AppError::UnknownBoard(name.to_string()))
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.backend == FetchBackend::Browserless
            && self.fetcher.browserless_url.trim().is_empty()
        {
            return Err(AppError::validation(
                "fetcher.browserless_url is required for the browserless backend",
            ));
        }
        if self.limits.max_results == 0 {
            return Err(AppError::validation("limits.max_results must be > 0"));
        }
        if self.limits.max_pages == 0 {
            return Err(AppError::validation("limits.max_pages must be > 0"));
        }
        for adapter in self.all_adapters() {
            CompiledAdapter::compile(&adapter)?;
        }
        Ok(())
    }
}

/// Which backend loads result pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchBackend {
    /// Plain HTTP GET, no script execution
    #[default]
    Http,
    /// Script-rendered HTML from a Browserless `/content` endpoint
    Browserless,
}

/// Page loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    #[serde(default)]
    pub backend: FetchBackend,

    /// User-Agent header for page requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Page load timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Wait after load so script-rendered listings can materialize
    #[serde(default = "defaults::settle_delay")]
    pub settle_delay_ms: u64,

    /// Browserless base URL (e.g. `http://localhost:3000`)
    #[serde(default)]
    pub browserless_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browserless_token: Option<String>,

    #[serde(default = "defaults::viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "defaults::viewport_height")]
    pub viewport_height: u32,

    /// Rendered backend waits for this selector; defaults to the adapter's item selectors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            backend: FetchBackend::default(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            settle_delay_ms: defaults::settle_delay(),
            browserless_url: String::new(),
            browserless_token: None,
            viewport_width: defaults::viewport_width(),
            viewport_height: defaults::viewport_height(),
            wait_for_selector: None,
        }
    }
}

/// Hard bounds applied to every scrape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScrapeLimits {
    /// Stop once this many records were accepted
    #[serde(default = "defaults::max_results")]
    pub max_results: usize,

    /// Never fetch more pages than this
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// Reject listings whose minimum experience exceeds this
    #[serde(default = "defaults::max_experience_years")]
    pub max_experience_years: u32,
}

impl Default for ScrapeLimits {
    fn default() -> Self {
        Self {
            max_results: defaults::max_results(),
            max_pages: defaults::max_pages(),
            max_experience_years: defaults::max_experience_years(),
        }
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn settle_delay() -> u64 {
        3000
    }
    pub fn viewport_width() -> u32 {
        1920
    }
    pub fn viewport_height() -> u32 {
        1080
    }

    pub fn max_results() -> usize {
        50
    }
    pub fn max_pages() -> usize {
        15
    }
    pub fn max_experience_years() -> u32 {
        2
    }
}
