// src/services/extractor.rs

//! Field extraction for listing nodes.
//!
//! Turns one result item into a `JobRecord` using the adapter's locator
//! cascades, then applies the experience screening.

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{JobRecord, NO_LINK, NOT_AVAILABLE, Pagination, SourceAdapter};
use crate::utils::absolutize;

use super::company;
use super::document::{
    CompiledLocator, element_text, element_text_without, first_match, parse_selector,
};
use super::experience::{ExperienceRange, Screening, screen};

/// Result of running one item node through extraction and screening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Accepted(JobRecord),
    Rejected {
        title: String,
        range: ExperienceRange,
    },
}

/// A `SourceAdapter` with every selector compiled and checked.
#[derive(Debug, Clone)]
pub struct CompiledAdapter {
    adapter: SourceAdapter,
    origin: Url,
    items: Vec<CompiledLocator>,
    title: Vec<CompiledLocator>,
    company: Vec<CompiledLocator>,
    location: Vec<CompiledLocator>,
    experience: Vec<CompiledLocator>,
    description: Vec<CompiledLocator>,
    next: Vec<CompiledLocator>,
}

impl CompiledAdapter {
    /// Compile an adapter, rejecting malformed configuration up front.
    pub fn compile(adapter: &SourceAdapter) -> Result<Self> {
        let name = &adapter.name;
        if name.trim().is_empty() {
            return Err(AppError::config("adapter name is empty"));
        }
        if adapter.items.is_empty() {
            return Err(AppError::config(format!("adapter '{name}' has no item locators")));
        }
        if adapter.fields.title.is_empty() {
            return Err(AppError::config(format!("adapter '{name}' has no title locators")));
        }

        let origin = Url::parse(&adapter.origin)?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "adapter '{name}' origin must be http(s): {}",
                adapter.origin
            )));
        }

        let next = match &adapter.pagination {
            Pagination::Offset { param, page_size } => {
                if param.trim().is_empty() || *page_size == 0 {
                    return Err(AppError::config(format!(
                        "adapter '{name}' needs an offset parameter and a page size > 0"
                    )));
                }
                Vec::new()
            }
            Pagination::Discovered { next } => CompiledLocator::compile_all(next)?,
        };

        let fields = &adapter.fields;
        Ok(Self {
            adapter: adapter.clone(),
            origin,
            items: CompiledLocator::compile_all(&adapter.items)?,
            title: CompiledLocator::compile_all(&fields.title)?,
            company: CompiledLocator::compile_all(&fields.company)?,
            location: CompiledLocator::compile_all(&fields.location)?,
            experience: CompiledLocator::compile_all(&fields.experience)?,
            description: CompiledLocator::compile_all(&fields.description)?,
            next,
        })
    }

    pub fn adapter(&self) -> &SourceAdapter {
        &self.adapter
    }

    /// Compiled next-page locators (empty for offset pagination).
    pub fn next_locators(&self) -> &[CompiledLocator] {
        &self.next
    }

    /// Listing nodes of a page: the first item locator matching anything wins.
    pub fn item_nodes<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.items
            .iter()
            .map(|locator| locator.select_all(document))
            .find(|nodes| !nodes.is_empty())
            .unwrap_or_default()
    }

    /// Extract and screen one listing node.
    pub fn extract(&self, item: ElementRef<'_>, max_years: u32) -> ItemOutcome {
        let title_match = self.title_of(item);
        let title = title_match
            .as_ref()
            .map(|(_, text)| text.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let company = self.company_name(item);
        let location = first_match(&self.location, item)
            .map(|(_, text)| text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let badge = first_match(&self.experience, item).map(|(_, text)| text);
        let description = if self.description.is_empty() {
            element_text(&item)
        } else {
            first_match(&self.description, item)
                .map(|(_, text)| text)
                .unwrap_or_default()
        };

        let experience = match screen(
            badge.as_deref(),
            &description,
            &self.adapter.experience_default,
            max_years,
        ) {
            Screening::Accept { display, .. } => display,
            Screening::Reject { range } => return ItemOutcome::Rejected { title, range },
        };

        let href = title_match
            .and_then(|(el, _)| el.value().attr("href"))
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| first_link(item));
        let link = match href {
            Some(href) => absolutize(&self.origin, &href),
            None => NO_LINK.to_string(),
        };

        ItemOutcome::Accepted(JobRecord {
            title,
            company,
            location,
            link,
            experience,
            source: self.adapter.source(),
        })
    }

    /// Title cascade; a locator whose text is only badge noise falls through.
    fn title_of<'a>(&self, item: ElementRef<'a>) -> Option<(ElementRef<'a>, String)> {
        self.title.iter().find_map(|locator| {
            let (el, _) = locator.find(item)?;
            let title = element_text_without(&el, &self.adapter.title_noise);
            (!title.is_empty()).then_some((el, title))
        })
    }

    fn company_name(&self, item: ElementRef<'_>) -> String {
        let primary = first_match(&self.company, item).map(|(_, text)| text);
        if let Some(name) = primary.as_ref().filter(|n| n.chars().count() >= 2) {
            return name.clone();
        }
        if self.adapter.company_heuristics {
            if let Some(name) =
                company::from_text(&item).or_else(|| company::from_class_names(&item))
            {
                return name;
            }
        }
        primary
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

fn first_link(item: ElementRef<'_>) -> Option<String> {
    let anchors = parse_selector("a[href]").ok()?;
    item.select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|h| !h.is_empty())
        .map(str::to_string)
}
