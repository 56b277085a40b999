//! Last-resort company name heuristics.
//!
//! Used only when an adapter's company cascade finds nothing usable. Patterns
//! are tried in order; each text node of the listing is scanned separately so
//! a match never spans two elements.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use super::document::{element_text, parse_selector, text_segments};

/// Words that show a match is listing structure rather than a company.
pub const STOPWORDS: [&str; 9] = [
    "Experience",
    "Years",
    "Salary",
    "Location",
    "Posted",
    "Apply",
    "Job",
    "Role",
    "Position",
];

const SUFFIXES: &str = "Ltd|Limited|Inc|Corp|Company|Technologies|Solutions|Systems|Services|Pvt|Private";

static COMPANY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Capitalized run ending in a corporate suffix
        format!(r"[A-Z][a-zA-Z\s&.,-]+(?:{SUFFIXES})"),
        // Any short capitalized run, suffix optional
        format!(r"[A-Z][a-zA-Z\s&.,-]{{2,30}}(?:\s+(?:{SUFFIXES}))?"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("company pattern is valid"))
    .collect()
});

fn is_structural(candidate: &str) -> bool {
    STOPWORDS.iter().any(|word| candidate.contains(word))
}

/// Infer a company name from the listing's text.
pub fn from_text(item: &ElementRef) -> Option<String> {
    let segments = text_segments(item);

    COMPANY_PATTERNS.iter().find_map(|pattern| {
        segments.iter().find_map(|segment| {
            pattern
                .find_iter(segment)
                .map(|m| m.as_str().trim())
                .find(|candidate| candidate.chars().count() > 2 && !is_structural(candidate))
                .map(str::to_string)
        })
    })
}

/// Pick the first element whose class mentions a company or subtitle.
pub fn from_class_names(item: &ElementRef) -> Option<String> {
    let candidates = parse_selector("span, div, a, p").ok()?;

    item.select(&candidates).find_map(|element| {
        let class_hit = element.value().classes().any(|class| {
            let class = class.to_lowercase();
            class.contains("company") || class.contains("subtitle")
        });
        if !class_hit {
            return None;
        }
        let text = element_text(&element);
        let len = text.chars().count();
        (len > 2 && len < 100).then_some(text)
    })
}
