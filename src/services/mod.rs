//! Service layer for the scraper.
//!
//! This module contains the extraction logic:
//! - Locator evaluation over parsed pages (`document`)
//! - Listing field extraction (`CompiledAdapter`)
//! - Experience parsing and screening (`ExperienceRange`, `screen`)
//! - Company name heuristics (`company`)
//! - Duplicate suppression (`DedupIndex`)

pub mod company;
pub mod document;
mod dedup;
mod experience;
mod extractor;

pub use dedup::{DedupIndex, Fingerprint};
pub use document::CompiledLocator;
pub use experience::{ExperienceRange, Screening, screen};
pub use extractor::{CompiledAdapter, ItemOutcome};
