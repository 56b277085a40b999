//! Job listing data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder for a text field no locator could resolve.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a link no locator could resolve.
pub const NO_LINK: &str = "#";

/// Job board that produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobSource {
    Indeed,
    Naukri,
    /// A board supplied through configuration
    Custom(String),
}

impl JobSource {
    pub fn as_str(&self) -> &str {
        match self {
            JobSource::Indeed => "Indeed",
            JobSource::Naukri => "Naukri",
            JobSource::Custom(name) => name,
        }
    }
}

impl From<&str> for JobSource {
    fn from(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "indeed" => JobSource::Indeed,
            "naukri" => JobSource::Naukri,
            _ => JobSource::Custom(name.trim().to_string()),
        }
    }
}

impl From<String> for JobSource {
    fn from(name: String) -> Self {
        JobSource::from(name.as_str())
    }
}

impl From<JobSource> for String {
    fn from(source: JobSource) -> Self {
        source.as_str().to_string()
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted job listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobRecord {
    /// Job title, `N/A` if unresolved
    pub title: String,

    /// Hiring company, `N/A` if unresolved
    pub company: String,

    /// Job location, `N/A` if unresolved
    pub location: String,

    /// Absolute URL of the posting, `#` if unresolved
    pub link: String,

    /// Experience requirement as displayed (e.g. "0-1 years", "Entry Level")
    pub experience: String,

    /// Board the record was scraped from
    pub source: JobSource,
}
