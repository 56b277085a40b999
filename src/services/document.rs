//! Document queries over parsed result pages.
//!
//! Thin layer over `scraper`: compiled locators, first-match cascades and
//! whitespace-normalized text.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Locator, TextMatch};

/// A `Locator` with its selector parsed.
#[derive(Debug, Clone)]
pub struct CompiledLocator {
    selector: Selector,
    source: String,
    attr: Option<String>,
    text_contains: Option<String>,
    text_match: TextMatch,
}

impl CompiledLocator {
    pub fn compile(locator: &Locator) -> Result<Self> {
        Ok(Self {
            selector: parse_selector(&locator.selector)?,
            source: locator.selector.clone(),
            attr: locator.attr.clone(),
            text_contains: locator
                .text_contains
                .as_ref()
                .map(|needle| needle.to_lowercase()),
            text_match: locator.text_match,
        })
    }

    /// Compile a whole cascade, failing on the first bad selector.
    pub fn compile_all(locators: &[Locator]) -> Result<Vec<Self>> {
        locators.iter().map(Self::compile).collect()
    }

    pub fn selector(&self) -> &str {
        &self.source
    }

    fn accepts(&self, element: &ElementRef) -> bool {
        match &self.text_contains {
            Some(needle) => self
                .text_match
                .matches(&element_text(element).to_lowercase(), needle),
            None => true,
        }
    }

    fn value_of(&self, element: &ElementRef) -> String {
        match &self.attr {
            Some(name) => element.value().attr(name).unwrap_or("").trim().to_string(),
            None => element_text(element),
        }
    }

    /// First descendant of `node` with a non-empty value.
    pub fn find<'a>(&self, node: ElementRef<'a>) -> Option<(ElementRef<'a>, String)> {
        node.select(&self.selector)
            .filter(|el| self.accepts(el))
            .find_map(|el| {
                let value = self.value_of(&el);
                (!value.is_empty()).then_some((el, value))
            })
    }

    /// Same as [`find`](Self::find) but over a whole document.
    pub fn find_in<'a>(&self, document: &'a Html) -> Option<(ElementRef<'a>, String)> {
        document
            .select(&self.selector)
            .filter(|el| self.accepts(el))
            .find_map(|el| {
                let value = self.value_of(&el);
                (!value.is_empty()).then_some((el, value))
            })
    }

    /// All matching elements of a document, in document order.
    pub fn select_all<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document
            .select(&self.selector)
            .filter(|el| self.accepts(el))
            .collect()
    }
}

/// Evaluate a cascade: the first locator yielding a non-empty value wins.
pub fn first_match<'a>(
    cascade: &[CompiledLocator],
    node: ElementRef<'a>,
) -> Option<(ElementRef<'a>, String)> {
    cascade.iter().find_map(|locator| locator.find(node))
}

/// Parse a CSS selector, mapping failures to a configuration error.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Text content of an element with whitespace collapsed.
pub fn element_text(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Text content with badge noise (e.g. "new") removed.
///
/// Noise text nodes are dropped, then noise words left at either end of the
/// text are trimmed. Words merely containing the noise ("Renewal") stay.
pub fn element_text_without(element: &ElementRef, noise: &[String]) -> String {
    let is_noise = |word: &str| noise.iter().any(|n| word.eq_ignore_ascii_case(n.trim()));

    let text: String = element
        .text()
        .filter(|chunk| !is_noise(chunk.trim()))
        .collect();

    let mut words: Vec<&str> = text.split_whitespace().collect();
    while words.last().is_some_and(|&w| is_noise(w)) {
        words.pop();
    }
    let start = words.iter().take_while(|&&w| is_noise(w)).count();
    words[start..].join(" ")
}

/// Non-empty trimmed text nodes below an element, in document order.
pub fn text_segments<'a>(element: &ElementRef<'a>) -> Vec<&'a str> {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(html: &Html) -> ElementRef<'_> {
        html.root_element()
    }

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div.class").is_ok());
        assert!(parse_selector(r#"[data-testid="jobListing"]"#).is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(matches!(
            parse_selector("[[invalid"),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn test_cascade_skips_empty_matches() {
        let html = Html::parse_fragment(
            r#"<div><span class="companyName">  </span><div class="company">Acme Labs</div></div>"#,
        );
        let cascade = CompiledLocator::compile_all(&[
            Locator::css("span.companyName"),
            Locator::css("div.company"),
        ])
        .unwrap();

        let (_, value) = first_match(&cascade, root(&html)).unwrap();
        assert_eq!(value, "Acme Labs");
    }

    #[test]
    fn test_cascade_order_wins_over_document_order() {
        let html = Html::parse_fragment(
            r#"<div><span class="location">Remote</span><div class="companyLocation">Bengaluru</div></div>"#,
        );
        let cascade = CompiledLocator::compile_all(&[
            Locator::css("div.companyLocation"),
            Locator::css("span.location"),
        ])
        .unwrap();

        let (_, value) = first_match(&cascade, root(&html)).unwrap();
        assert_eq!(value, "Bengaluru");
    }

    #[test]
    fn test_attribute_and_text_filter() {
        let html = Html::parse_fragment(
            r#"<div><a href="/p/1">1</a><a href="/p/3">Next &gt;</a></div>"#,
        );
        let next = CompiledLocator::compile(&Locator::css("a").with_text("next").attr("href"))
            .unwrap();

        let (_, href) = next.find(root(&html)).unwrap();
        assert_eq!(href, "/p/3");
    }

    #[test]
    fn test_text_is_whitespace_normalized() {
        let html = Html::parse_fragment("<h2>\n  Intern -\n   Backend </h2>");
        let h2 = CompiledLocator::compile(&Locator::css("h2")).unwrap();
        let (_, text) = h2.find(root(&html)).unwrap();
        assert_eq!(text, "Intern - Backend");
    }

    #[test]
    fn test_noise_nodes_are_dropped() {
        let html = Html::parse_fragment(
            r#"<a><span>Renewable Energy Analyst</span> <span class="badge">new</span></a>"#,
        );
        let a = CompiledLocator::compile(&Locator::css("a")).unwrap();
        let (el, _) = a.find(root(&html)).unwrap();
        assert_eq!(
            element_text_without(&el, &["new".to_string()]),
            "Renewable Energy Analyst"
        );
    }

    #[test]
    fn test_noise_word_in_same_text_node() {
        let noise = ["new".to_string()];
        for (html, expected) in [
            ("<a>Data Analyst new</a>", "Data Analyst"),
            ("<a>NEW  Support Engineer</a>", "Support Engineer"),
            ("<a>Renewal Analyst</a>", "Renewal Analyst"),
            ("<a>New Business Associate - Sales</a>", "Business Associate - Sales"),
            ("<a>new</a>", ""),
        ] {
            let html = Html::parse_fragment(html);
            let a = CompiledLocator::compile(&Locator::css("a")).unwrap();
            let (el, _) = a.find(root(&html)).unwrap();
            assert_eq!(element_text_without(&el, &noise), expected);
        }
    }

    #[test]
    fn test_no_match_yields_none() {
        let html = Html::parse_fragment("<div><p>nothing here</p></div>");
        let cascade = CompiledLocator::compile_all(&[Locator::css("span.title")]).unwrap();
        assert!(first_match(&cascade, root(&html)).is_none());
    }
}
