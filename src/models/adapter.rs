// src/models/adapter.rs

//! Declarative job board adapters.
//!
//! An adapter carries everything board specific: how the first result URL is
//! built, which nodes are listings, the locator cascade for every field and
//! how the next page is found. Adding a board means adding one of these.

use serde::{Deserialize, Serialize};

use super::job::JobSource;

/// A rule for finding one piece of data below a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// CSS selector evaluated against the node's descendants
    pub selector: String,

    /// Read this attribute instead of the element text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,

    /// Only accept elements whose text contains this (case-insensitive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_contains: Option<String>,

    /// How `text_contains` is matched against the element text
    #[serde(default)]
    pub text_match: TextMatch,
}

/// Matching mode for a locator's text filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Needle appears anywhere in the text
    #[default]
    Contains,
    /// Text begins with the needle as a whole word ("Next", "Next »", not "Next.js")
    Leading,
}

impl TextMatch {
    /// Both arguments are expected lowercased.
    pub fn matches(self, text: &str, needle: &str) -> bool {
        match self {
            TextMatch::Contains => text.contains(needle),
            TextMatch::Leading => match text.trim_start().strip_prefix(needle) {
                Some(rest) => {
                    let word = rest.split(char::is_whitespace).next().unwrap_or("");
                    !word.chars().any(char::is_alphanumeric)
                }
                None => false,
            },
        }
    }
}

impl Locator {
    /// Locator reading the text of the first element matching `selector`.
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            attr: None,
            text_contains: None,
            text_match: TextMatch::Contains,
        }
    }

    /// Read an attribute value instead of the text.
    pub fn attr(mut self, name: impl Into<String>) -> Self {
        self.attr = Some(name.into());
        self
    }

    /// Restrict matches to elements whose text contains `needle`.
    pub fn with_text(mut self, needle: impl Into<String>) -> Self {
        self.text_contains = Some(needle.into());
        self.text_match = TextMatch::Contains;
        self
    }

    /// Restrict matches to elements whose text starts with the word `needle`.
    pub fn with_leading_text(mut self, needle: impl Into<String>) -> Self {
        self.text_contains = Some(needle.into());
        self.text_match = TextMatch::Leading;
        self
    }
}

/// Locator cascades for each extracted field, tried in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldLocators {
    pub title: Vec<Locator>,

    #[serde(default)]
    pub company: Vec<Locator>,

    #[serde(default)]
    pub location: Vec<Locator>,

    /// Dedicated experience element (e.g. "0-2 Yrs" badge)
    #[serde(default)]
    pub experience: Vec<Locator>,

    /// Description snippet scanned for experience requirements.
    /// When empty, the whole item text is scanned instead.
    #[serde(default)]
    pub description: Vec<Locator>,
}

/// How the driver moves from one result page to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Pagination {
    /// Numeric offset query parameter (`start = page * page_size`)
    Offset { param: String, page_size: u32 },

    /// Next page link discovered on the rendered page
    Discovered { next: Vec<Locator> },
}

impl Pagination {
    pub fn name(&self) -> &'static str {
        match self {
            Pagination::Offset { .. } => "offset",
            Pagination::Discovered { .. } => "discovered",
        }
    }
}

/// Board-specific scraping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAdapter {
    /// Board name, also used as the record source
    pub name: String,

    /// Search URL used when the caller gives none
    pub default_url: String,

    /// Origin prefixed to relative listing links
    pub origin: String,

    /// Substrings (case-insensitive) showing the URL already filters by experience
    #[serde(default)]
    pub filter_markers: Vec<String>,

    /// Query parameter appended when no marker is present
    pub filter_param: String,

    /// Item node cascade; the first locator matching any node wins
    pub items: Vec<Locator>,

    pub fields: FieldLocators,

    pub pagination: Pagination,

    /// Experience display value when nothing parseable was found
    #[serde(default = "default_experience_label")]
    pub experience_default: String,

    /// Enable the regex/class company-name fallback
    #[serde(default)]
    pub company_heuristics: bool,

    /// Badge text nodes dropped from titles
    #[serde(default = "default_title_noise")]
    pub title_noise: Vec<String>,
}

fn default_experience_label() -> String {
    "Entry Level".to_string()
}

fn default_title_noise() -> Vec<String> {
    vec!["new".to_string()]
}

fn css_all(selectors: &[&str]) -> Vec<Locator> {
    selectors.iter().map(|s| Locator::css(*s)).collect()
}

impl SourceAdapter {
    pub fn source(&self) -> JobSource {
        JobSource::from(self.name.as_str())
    }

    /// Build the first result URL from a caller-supplied base URL.
    ///
    /// An empty base falls back to the adapter default. The experience filter
    /// parameter is appended unless one of the filter markers is present.
    pub fn start_url(&self, base_url: &str) -> String {
        let base = base_url.trim();
        let mut url = if base.is_empty() {
            self.default_url.clone()
        } else {
            base.to_string()
        };

        let lower = url.to_lowercase();
        let filtered = self
            .filter_markers
            .iter()
            .any(|marker| lower.contains(&marker.to_lowercase()));

        if !filtered && !self.filter_param.is_empty() {
            let sep = if url.contains('?') { '&' } else { '?' };
            url.push(sep);
            url.push_str(&self.filter_param);
        }
        url
    }

    /// Indeed-style board: offset pagination, snippet-based experience.
    pub fn indeed() -> Self {
        Self {
            name: "Indeed".to_string(),
            default_url: "https://in.indeed.com/jobs?q=&l=&sc=0kf%3Aattr%28FSME%29%3B".to_string(),
            origin: "https://in.indeed.com".to_string(),
            filter_markers: vec!["attr(FSME)".to_string(), "explvl=entry_level".to_string()],
            filter_param: "explvl=entry_level".to_string(),
            items: css_all(&[
                "div.job_seen_beacon",
                "div.cardOutline",
                r#"div[data-testid="jobListing"]"#,
            ]),
            fields: FieldLocators {
                title: css_all(&["h2.jobTitle > a", "h2 > a", "h2 a", "a[data-jk]", "h2", "h3"]),
                company: css_all(&[
                    "span.companyName",
                    "span.company",
                    "div.company",
                    r#"[data-testid="company-name"]"#,
                ]),
                location: css_all(&[
                    "div.companyLocation",
                    "div.location",
                    "span.location",
                    r#"[data-testid="text-location"]"#,
                ]),
                experience: Vec::new(),
                description: css_all(&[
                    "div.job-snippet",
                    "div.summary",
                    ".job-snippet",
                    r#"[data-testid="job-description"]"#,
                ]),
            },
            pagination: Pagination::Offset {
                param: "start".to_string(),
                page_size: 10,
            },
            experience_default: default_experience_label(),
            company_heuristics: false,
            title_noise: default_title_noise(),
        }
    }

    /// Naukri-style board: discovered next links, dedicated experience badge.
    pub fn naukri() -> Self {
        Self {
            name: "Naukri".to_string(),
            default_url: "https://www.naukri.com/jobs-0-to-2-years-experience".to_string(),
            origin: "https://www.naukri.com".to_string(),
            filter_markers: vec!["0-to-2-years".to_string(), "experience".to_string()],
            filter_param: "experience=0-2%20years".to_string(),
            items: css_all(&[
                "article.jobTuple",
                "div.jobTuple",
                "div.job-tuple",
                "div[data-job-id]",
                ".srp-jobtuple-wrapper",
                ".jobTupleHeader",
            ]),
            fields: FieldLocators {
                title: css_all(&["a.title", "a.jobTitle", "a[title]", "a.job-title"]),
                company: css_all(&[
                    "a.subTitle",
                    "a.companyName",
                    "a.company-name",
                    "div.company-name",
                    "div.companyInfo span.subTitle",
                    "span.companyName",
                    r#"[title*="company"]"#,
                    ".comp-name",
                    ".company",
                    "span.subTitle",
                    "div.subTitle",
                ]),
                location: css_all(&[
                    "span.locWdth",
                    "span.location",
                    "li.location",
                    "div.location",
                ]),
                experience: css_all(&[
                    "li.experience",
                    "span.experience",
                    "div.experience",
                    r#"[title*="experience"]"#,
                ]),
                description: Vec::new(),
            },
            pagination: Pagination::Discovered {
                next: vec![
                    Locator::css("a.fright").with_leading_text("Next").attr("href"),
                    Locator::css("a").with_leading_text("Next").attr("href"),
                    Locator::css(r#"a[class*="next"]"#).attr("href"),
                    Locator::css("span.np.fright > a").attr("href"),
                    Locator::css(r#"div[class*="pagination"] a:last-of-type"#).attr("href"),
                ],
            },
            experience_default: "N/A".to_string(),
            company_heuristics: true,
            title_noise: default_title_noise(),
        }
    }

    /// All adapters shipped with the crate.
    pub fn builtin() -> Vec<Self> {
        vec![Self::indeed(), Self::naukri()]
    }
}
