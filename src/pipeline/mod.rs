//! Pipeline entry points for scrape runs.
//!
//! - `Scraper::run`: drive one board's pagination and return a `ScrapeReport`
//! - `scrape`: same with default limits, returning only the records

pub mod cursor;
pub mod scrape;

pub use cursor::{Cursor, discover_next};
pub use scrape::{ScrapeReport, Scraper, StopReason, scrape};
