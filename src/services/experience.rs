//! Experience requirement parsing and screening.
//!
//! One pattern covers both badge text ("0-2 Yrs") and free-form descriptions
//! ("1-3 years of experience"). Descriptions additionally need the word
//! "experience" after the unit, so unrelated numbers ("5 years old company")
//! do not count as requirements.

use std::sync::LazyLock;

use regex::Regex;

static EXPERIENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+)\s*\+?\s*(?:(?:-|–|to)\s*(\d+)\s*)?(?:years?|yrs?|y)\b(?:[\s\w]*?\b(experience|exp)\b)?",
    )
    .expect("experience pattern is valid")
});

/// Inclusive range of required years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceRange {
    pub min: u32,
    pub max: u32,
}

impl ExperienceRange {
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Parse display text such as "0-2 Yrs" or "1 year".
    pub fn parse(text: &str) -> Option<Self> {
        Self::find(text, false)
    }

    /// Parse a requirement from description text ("2-4 years of experience").
    pub fn parse_requirement(text: &str) -> Option<Self> {
        Self::find(text, true)
    }

    fn find(text: &str, needs_context: bool) -> Option<Self> {
        EXPERIENCE_PATTERN
            .captures_iter(text)
            .filter(|caps| !needs_context || caps.get(3).is_some())
            .find_map(|caps| {
                let lower: u32 = caps.get(1)?.as_str().parse().ok()?;
                let upper = match caps.get(2) {
                    Some(m) => m.as_str().parse().ok()?,
                    None => lower,
                };
                Some(Self::new(lower, upper))
            })
    }

    /// Display form used in records: "0-1 years" or "2 years".
    pub fn label(&self) -> String {
        if self.min == self.max {
            format!("{} years", self.min)
        } else {
            format!("{}-{} years", self.min, self.max)
        }
    }
}

/// Outcome of the experience filter for one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    /// Listing passes; `display` goes into the record
    Accept {
        display: String,
        range: Option<ExperienceRange>,
    },
    /// Listing asks for more experience than allowed
    Reject { range: ExperienceRange },
}

/// Apply the experience policy to a listing.
///
/// A dedicated badge wins over the description. Listings without any
/// parseable requirement are accepted with `default_label`.
pub fn screen(
    badge: Option<&str>,
    description: &str,
    default_label: &str,
    max_years: u32,
) -> Screening {
    let (display, range) = match badge.map(str::trim).filter(|b| !b.is_empty()) {
        Some(badge) => (badge.to_string(), ExperienceRange::parse(badge)),
        None => match ExperienceRange::parse_requirement(description) {
            Some(range) => (range.label(), Some(range)),
            None => (default_label.to_string(), None),
        },
    };

    match range {
        Some(range) if range.min > max_years => Screening::Reject { range },
        range => Screening::Accept { display, range },
    }
}
