//! Storage abstractions for scrape results.
//!
//! A run is persisted as one pretty-printed JSON document:
//!
//! ```text
//! {
//!   "scraped_at": "2026-01-05T09:30:00Z",
//!   "board": "Naukri",
//!   "count": 2,
//!   "jobs": [ { "title": ..., "company": ..., ... }, ... ]
//! }
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::JobRecord;

pub use local::LocalStorage;

/// Persisted output of one scrape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsFile {
    /// When the run finished
    pub scraped_at: DateTime<Utc>,
    /// Adapter name
    pub board: String,
    pub count: usize,
    pub jobs: Vec<JobRecord>,
}

impl JobsFile {
    pub fn new(board: impl Into<String>, jobs: Vec<JobRecord>) -> Self {
        Self {
            scraped_at: Utc::now(),
            board: board.into(),
            count: jobs.len(),
            jobs,
        }
    }
}

/// Trait for result storage backends.
#[async_trait]
pub trait JobStorage: Send + Sync {
    /// Write a run under `key`, replacing any previous content.
    async fn write_jobs(&self, key: &str, file: &JobsFile) -> Result<()>;

    /// Load a previously written run, `None` if absent.
    async fn load_jobs(&self, key: &str) -> Result<Option<JobsFile>>;
}
