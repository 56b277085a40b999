//! Pagination cursors and next-page discovery.

use scraper::Html;
use url::Url;

use crate::services::CompiledLocator;
use crate::utils::resolve_url;
use crate::utils::url::synthesize_next;

/// Where the driver fetches next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// Zero-based page index for offset pagination
    Page(usize),
    /// Absolute URL for discovered pagination
    Url(String),
}

fn usable(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty() && !href.starts_with('#') && !href.to_lowercase().starts_with("javascript:")
}

/// Find the URL of the page after `current`.
///
/// Probes the adapter's next-page locators in order; if none yields a new
/// URL, falls back to URL-shape synthesis. `page` is the 1-based index of
/// the page held in `document`.
pub fn discover_next(
    document: &Html,
    locators: &[CompiledLocator],
    current: &str,
    page: usize,
) -> Option<String> {
    let base = Url::parse(current).ok();

    let discovered = locators.iter().find_map(|locator| {
        let (_, href) = locator.find_in(document)?;
        if !usable(&href) {
            return None;
        }
        let next = match &base {
            Some(base) => resolve_url(base, &href),
            None => href,
        };
        if next == current {
            log::debug!("Next locator '{}' points at the current page", locator.selector());
            return None;
        }
        Some(next)
    });

    if let Some(next) = discovered {
        log::debug!("Found next page URL: {next}");
        return Some(next);
    }

    let synthesized = synthesize_next(current, page);
    if let Some(next) = &synthesized {
        log::debug!("Synthesized next page URL: {next}");
    }
    synthesized
}
