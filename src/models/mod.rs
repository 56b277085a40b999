// src/models/mod.rs

//! Domain models for the scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod adapter;
mod config;
mod job;

// Re-export all public types
pub use adapter::{FieldLocators, Locator, Pagination, SourceAdapter, TextMatch};
pub use config::{Config, FetchBackend, FetcherConfig, ScrapeLimits};
pub use job::{JobRecord, JobSource, NO_LINK, NOT_AVAILABLE};
