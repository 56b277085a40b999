// src/pipeline/scrape.rs

//! Paginated scrape driver.
//!
//! One page is fetched, fully extracted and decided on before the next fetch.
//! Board-side problems (failed loads, empty pages, missing next links) end
//! the scrape with whatever was collected; only configuration errors are
//! returned as `Err`.

use std::collections::HashSet;
use std::fmt;

use scraper::Html;
use serde::Serialize;

use crate::error::Result;
use crate::fetch::{PageFetcher, RenderedPage};
use crate::models::{JobRecord, Pagination, ScrapeLimits, SourceAdapter};
use crate::services::{CompiledAdapter, DedupIndex, ItemOutcome};
use crate::utils::url::with_offset;

use super::cursor::{Cursor, discover_next};

/// Why a scrape ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// `max_results` records were collected
    ResultCap,
    /// `max_pages` pages were fetched
    PageLimit,
    /// A page had no listing nodes
    NoItems,
    /// No next page could be found
    PaginationExhausted,
    /// The next page was already visited
    LoopDetected,
    /// A page failed to load; earlier results are kept
    FetchFailed { url: String, message: String },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::ResultCap => write!(f, "result cap reached"),
            StopReason::PageLimit => write!(f, "page limit reached"),
            StopReason::NoItems => write!(f, "no more job listings"),
            StopReason::PaginationExhausted => write!(f, "no next page"),
            StopReason::LoopDetected => write!(f, "pagination loop detected"),
            StopReason::FetchFailed { url, message } => {
                write!(f, "failed to load {url}: {message}")
            }
        }
    }
}

/// Summary of a finished scrape.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    /// Accepted records in discovery order
    pub jobs: Vec<JobRecord>,
    pub pages_fetched: usize,
    pub items_seen: usize,
    /// Items dropped by the experience filter
    pub rejected: usize,
    /// Items dropped as duplicates
    pub duplicates: usize,
    pub stop: StopReason,
}

/// Working state of one scrape; never outlives the call.
#[derive(Debug)]
struct ScrapeSession {
    start_url: String,
    cursor: Cursor,
    results: Vec<JobRecord>,
    seen: DedupIndex,
    visited_urls: HashSet<String>,
    pages_fetched: usize,
    items_seen: usize,
    rejected: usize,
    duplicates: usize,
}

impl ScrapeSession {
    fn new(start_url: String, cursor: Cursor) -> Self {
        Self {
            start_url,
            cursor,
            results: Vec::new(),
            seen: DedupIndex::new(),
            visited_urls: HashSet::new(),
            pages_fetched: 0,
            items_seen: 0,
            rejected: 0,
            duplicates: 0,
        }
    }

    fn finish(self, stop: StopReason) -> ScrapeReport {
        ScrapeReport {
            jobs: self.results,
            pages_fetched: self.pages_fetched,
            items_seen: self.items_seen,
            rejected: self.rejected,
            duplicates: self.duplicates,
            stop,
        }
    }
}

/// Driver state after a page has been processed.
enum Decision {
    Continue(Cursor),
    Stop(StopReason),
}

/// Scrapes one board with a compiled adapter.
#[derive(Debug, Clone)]
pub struct Scraper {
    adapter: CompiledAdapter,
    limits: ScrapeLimits,
}

impl Scraper {
    /// Compile the adapter; malformed configuration fails here, before any fetch.
    pub fn new(adapter: &SourceAdapter, limits: ScrapeLimits) -> Result<Self> {
        Ok(Self {
            adapter: CompiledAdapter::compile(adapter)?,
            limits,
        })
    }

    pub fn adapter(&self) -> &SourceAdapter {
        self.adapter.adapter()
    }

    /// Run a scrape from `base_url` (empty for the adapter default).
    ///
    /// The fetcher is closed before returning, on every path.
    pub async fn run<F: PageFetcher>(&self, mut fetcher: F, base_url: &str) -> ScrapeReport {
        let start_url = self.adapter().start_url(base_url);
        let cursor = match self.adapter().pagination {
            Pagination::Offset { .. } => Cursor::Page(0),
            Pagination::Discovered { .. } => Cursor::Url(start_url.clone()),
        };
        let mut session = ScrapeSession::new(start_url, cursor);

        log::info!("Starting {} scraper...", self.adapter().name);
        let stop = self.drive(&mut fetcher, &mut session).await;

        if let Err(e) = fetcher.close().await {
            log::warn!("Failed to close page fetcher: {}", e);
        }

        log::info!(
            "Found {} jobs on {} ({} page(s), {} rejected, {} duplicates; {})",
            session.results.len(),
            self.adapter().name,
            session.pages_fetched,
            session.rejected,
            session.duplicates,
            stop
        );
        session.finish(stop)
    }

    async fn drive<F: PageFetcher>(
        &self,
        fetcher: &mut F,
        session: &mut ScrapeSession,
    ) -> StopReason {
        loop {
            if session.results.len() >= self.limits.max_results {
                return StopReason::ResultCap;
            }
            if session.pages_fetched >= self.limits.max_pages {
                return StopReason::PageLimit;
            }

            let url = self.page_url(session);
            if let Cursor::Url(_) = session.cursor {
                if !session.visited_urls.insert(url.clone()) {
                    log::info!("Already visited {}, stopping", url);
                    return StopReason::LoopDetected;
                }
            }

            log::info!("Scraping page {}: {}", session.pages_fetched + 1, url);
            let page = match fetcher.load(&url).await {
                Ok(page) => page,
                Err(e) => {
                    log::warn!(
                        "An error occurred on page {}: {}",
                        session.pages_fetched + 1,
                        e
                    );
                    return StopReason::FetchFailed {
                        url,
                        message: e.to_string(),
                    };
                }
            };
            session.pages_fetched += 1;

            match self.process_page(&page, session) {
                Decision::Continue(cursor) => session.cursor = cursor,
                Decision::Stop(reason) => return reason,
            }
        }
    }

    fn page_url(&self, session: &ScrapeSession) -> String {
        match (&session.cursor, &self.adapter().pagination) {
            (Cursor::Page(page), Pagination::Offset { param, page_size }) => {
                let offset = *page as u64 * u64::from(*page_size);
                with_offset(&session.start_url, param, offset)
            }
            (Cursor::Page(_), Pagination::Discovered { .. }) => session.start_url.clone(),
            (Cursor::Url(url), _) => url.clone(),
        }
    }

    /// Extract every listing of a loaded page, then pick the next cursor.
    fn process_page(&self, page: &RenderedPage, session: &mut ScrapeSession) -> Decision {
        let document = Html::parse_document(&page.html);
        let nodes = self.adapter.item_nodes(&document);
        if nodes.is_empty() {
            log::info!("No more job listings found. Stopping.");
            return Decision::Stop(StopReason::NoItems);
        }
        log::info!(
            "Found {} job elements on page {}",
            nodes.len(),
            session.pages_fetched
        );

        for node in nodes {
            if session.results.len() >= self.limits.max_results {
                break;
            }
            session.items_seen += 1;

            match self.adapter.extract(node, self.limits.max_experience_years) {
                ItemOutcome::Rejected { title, range } => {
                    session.rejected += 1;
                    log::debug!(
                        "Skipped '{}': requires {}-{} years",
                        title,
                        range.min,
                        range.max
                    );
                }
                ItemOutcome::Accepted(job) => {
                    if session.seen.admit(&job) {
                        log::info!("Added job: {} at {}", job.title, job.company);
                        session.results.push(job);
                    } else {
                        session.duplicates += 1;
                        log::debug!("Duplicate job skipped: {} at {}", job.title, job.company);
                    }
                }
            }
        }

        if session.results.len() >= self.limits.max_results {
            return Decision::Stop(StopReason::ResultCap);
        }
        if session.pages_fetched >= self.limits.max_pages {
            return Decision::Stop(StopReason::PageLimit);
        }

        match &session.cursor {
            Cursor::Page(page) => Decision::Continue(Cursor::Page(page + 1)),
            Cursor::Url(current) => match discover_next(
                &document,
                self.adapter.next_locators(),
                current,
                session.pages_fetched,
            ) {
                Some(next) => Decision::Continue(Cursor::Url(next)),
                None => Decision::Stop(StopReason::PaginationExhausted),
            },
        }
    }
}

/// Scrape a board with default limits and return the accepted records.
///
/// Fails only when the adapter configuration is invalid; the fetcher is
/// closed in that case too.
pub async fn scrape<F: PageFetcher>(
    adapter: &SourceAdapter,
    base_url: &str,
    mut fetcher: F,
) -> Result<Vec<JobRecord>> {
    let scraper = match Scraper::new(adapter, ScrapeLimits::default()) {
        Ok(scraper) => scraper,
        Err(e) => {
            if let Err(close_err) = fetcher.close().await {
                log::warn!("Failed to close page fetcher: {}", close_err);
            }
            return Err(e);
        }
    };
    Ok(scraper.run(fetcher, base_url).await.jobs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::models::Locator;

    /// Serves fixture HTML per URL and records every request.
    #[derive(Clone, Default)]
    struct FakeFetcher {
        pages: HashMap<String, String>,
        failing: HashSet<String>,
        requested: Arc<Mutex<Vec<String>>>,
        closed: Arc<AtomicBool>,
    }

    impl FakeFetcher {
        fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
            self.pages.insert(url.into(), html.into());
            self
        }

        fn fail(mut self, url: impl Into<String>) -> Self {
            self.failing.insert(url.into());
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }

        fn was_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn load(&mut self, url: &str) -> Result<RenderedPage> {
            self.requested.lock().unwrap().push(url.to_string());
            if self.failing.contains(url) {
                return Err(AppError::fetch(url, "timed out"));
            }
            Ok(RenderedPage {
                url: url.to_string(),
                html: self
                    .pages
                    .get(url)
                    .cloned()
                    .unwrap_or_else(|| "<html><body></body></html>".to_string()),
            })
        }

        async fn close(&mut self) -> Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    const INDEED_BASE: &str = "https://in.indeed.com/jobs?q=rust&explvl=entry_level";

    fn indeed_url(page: usize) -> String {
        format!("{INDEED_BASE}&start={}", page * 10)
    }

    fn indeed_card(title: &str, company: &str, snippet: &str) -> String {
        format!(
            r#"<div class="job_seen_beacon">
                 <h2 class="jobTitle"><a href="/rc/clk?jk={title}">{title}</a></h2>
                 <span class="companyName">{company}</span>
                 <div class="companyLocation">Bengaluru</div>
                 <div class="job-snippet">{snippet}</div>
               </div>"#
        )
    }

    fn html_page(items: &[String], extra: &str) -> String {
        format!("<html><body>{}{}</body></html>", items.join("\n"), extra)
    }

    fn indeed_scraper() -> Scraper {
        Scraper::new(&SourceAdapter::indeed(), ScrapeLimits::default()).unwrap()
    }

    fn naukri_tuple(title: &str, experience: &str) -> String {
        let slug = title.to_lowercase().replace(' ', "-");
        format!(
            r#"<article class="jobTuple">
                 <a class="title" href="/job-listings-{slug}">{title}</a>
                 <a class="subTitle">Acme Pvt Ltd</a>
                 <ul><li class="experience">{experience}</li><li class="location">Pune</li></ul>
               </article>"#
        )
    }

    #[tokio::test]
    async fn test_offset_stops_at_page_limit() {
        let mut fetcher = FakeFetcher::default();
        for page in 0..20 {
            let card = indeed_card(&format!("Trainee{page}"), "Acme", "Freshers welcome");
            fetcher = fetcher.page(indeed_url(page), html_page(&[card], ""));
        }

        let report = indeed_scraper()
            .run(fetcher.clone(), "https://in.indeed.com/jobs?q=rust")
            .await;

        assert_eq!(report.stop, StopReason::PageLimit);
        assert_eq!(report.pages_fetched, 15);
        assert_eq!(report.jobs.len(), 15);
        assert_eq!(fetcher.requested().len(), 15);
        assert_eq!(fetcher.requested()[1], indeed_url(1));
        assert!(fetcher.was_closed());
    }

    #[tokio::test]
    async fn test_result_cap_truncates_mid_page() {
        let mut fetcher = FakeFetcher::default();
        for page in 0..3 {
            let cards: Vec<String> = (0..20)
                .map(|i| indeed_card(&format!("Analyst{page}x{i}"), "Acme", ""))
                .collect();
            fetcher = fetcher.page(indeed_url(page), html_page(&cards, ""));
        }

        let report = indeed_scraper().run(fetcher.clone(), INDEED_BASE).await;

        assert_eq!(report.stop, StopReason::ResultCap);
        assert_eq!(report.jobs.len(), 50);
        assert_eq!(report.pages_fetched, 3);
        assert_eq!(report.jobs[0].title, "Analyst0x0");
        assert_eq!(report.jobs[49].title, "Analyst2x9");
    }

    #[tokio::test]
    async fn test_duplicates_and_rejections() {
        let cards = vec![
            indeed_card("Support Engineer", "Acme", "0-1 years of experience"),
            indeed_card("Support Engineer", "ACME ", ""),
            indeed_card("Staff Engineer", "Acme", "8-10 years of experience"),
            indeed_card("QA Intern", "Beta", ""),
        ];
        let fetcher = FakeFetcher::default().page(indeed_url(0), html_page(&cards, ""));

        let report = indeed_scraper().run(fetcher, INDEED_BASE).await;

        let titles: Vec<&str> = report.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Support Engineer", "QA Intern"]);
        assert_eq!(report.jobs[0].experience, "0-1 years");
        assert_eq!(report.jobs[1].experience, "Entry Level");
        assert_eq!(report.items_seen, 4);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.rejected, 1);
        // page 2 is served empty by the fake
        assert_eq!(report.stop, StopReason::NoItems);
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_earlier_pages() {
        let fetcher = FakeFetcher::default()
            .page(indeed_url(0), html_page(&[indeed_card("A", "Acme", "")], ""))
            .page(indeed_url(1), html_page(&[indeed_card("B", "Acme", "")], ""))
            .fail(indeed_url(2));

        let report = indeed_scraper().run(fetcher.clone(), INDEED_BASE).await;

        let titles: Vec<&str> = report.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(report.pages_fetched, 2);
        assert!(matches!(
            report.stop,
            StopReason::FetchFailed { ref url, .. } if *url == indeed_url(2)
        ));
        assert!(fetcher.was_closed());
    }

    #[tokio::test]
    async fn test_discovered_pagination_detects_loop() {
        let page1 = "https://www.naukri.com/python-jobs?experience=0-2%20years";
        let page2 = "https://www.naukri.com/python-jobs-2?experience=0-2%20years";
        let fetcher = FakeFetcher::default()
            .page(
                page1,
                html_page(
                    &[
                        naukri_tuple("Python Trainee", "0-1 Yrs"),
                        naukri_tuple("ML Intern", "3-5 Yrs"),
                    ],
                    r#"<a class="fright" href="/python-jobs-2?experience=0-2%20years">Next</a>"#,
                ),
            )
            .page(
                page2,
                html_page(
                    &[naukri_tuple("Django Developer", "1-2 Yrs")],
                    r#"<a class="fright" href="/python-jobs?experience=0-2%20years">Next</a>"#,
                ),
            );

        let report = Scraper::new(&SourceAdapter::naukri(), ScrapeLimits::default())
            .unwrap()
            .run(fetcher.clone(), "https://www.naukri.com/python-jobs")
            .await;

        assert_eq!(report.stop, StopReason::LoopDetected);
        assert_eq!(fetcher.requested(), vec![page1.to_string(), page2.to_string()]);
        let titles: Vec<&str> = report.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Python Trainee", "Django Developer"]);
        assert_eq!(report.jobs[0].link, "https://www.naukri.com/job-listings-python-trainee");
        assert_eq!(report.rejected, 1);
    }

    #[tokio::test]
    async fn test_discovered_pagination_exhausted() {
        let start = "https://www.naukri.com/jobs-in-delhi-110001?experience=0-2%20years";
        let fetcher = FakeFetcher::default().page(
            start,
            html_page(&[naukri_tuple("Trainee", "0-2 Yrs")], ""),
        );

        let report = Scraper::new(&SourceAdapter::naukri(), ScrapeLimits::default())
            .unwrap()
            .run(fetcher, "https://www.naukri.com/jobs-in-delhi-110001")
            .await;

        assert_eq!(report.stop, StopReason::PaginationExhausted);
        assert_eq!(report.jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_custom_limits() {
        let limits = ScrapeLimits {
            max_results: 50,
            max_pages: 2,
            max_experience_years: 0,
        };
        let mut fetcher = FakeFetcher::default();
        for page in 0..3 {
            let cards = vec![
                indeed_card(&format!("Fresher{page}"), "Acme", "0 years experience"),
                indeed_card(&format!("Junior{page}"), "Acme", "1-2 years experience"),
            ];
            fetcher = fetcher.page(indeed_url(page), html_page(&cards, ""));
        }

        let report = Scraper::new(&SourceAdapter::indeed(), limits)
            .unwrap()
            .run(fetcher, INDEED_BASE)
            .await;

        let titles: Vec<&str> = report.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Fresher0", "Fresher1"]);
        assert_eq!(report.stop, StopReason::PageLimit);
    }

    #[tokio::test]
    async fn test_scrape_rejects_bad_adapter_and_closes_fetcher() {
        let mut adapter = SourceAdapter::indeed();
        adapter.items = vec![Locator::css("div[")];
        let fetcher = FakeFetcher::default();

        let result = scrape(&adapter, "", fetcher.clone()).await;

        assert!(matches!(result, Err(AppError::Selector { .. })));
        assert!(fetcher.requested().is_empty());
        assert!(fetcher.was_closed());
    }

    #[tokio::test]
    async fn test_scrape_uses_default_url() {
        let adapter = SourceAdapter::naukri();
        let fetcher = FakeFetcher::default().page(
            adapter.default_url.clone(),
            html_page(&[naukri_tuple("Graduate Trainee", "0-1 Yrs")], ""),
        );

        let jobs = scrape(&adapter, "", fetcher.clone()).await.unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(fetcher.requested()[0], adapter.default_url);
    }
}
