//! Duplicate suppression for accepted listings.

use std::collections::HashSet;

use crate::models::JobRecord;

/// Normalized `title_company_location` key of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(job: &JobRecord) -> Self {
        let normalize = |s: &str| s.trim().to_lowercase();
        Self(format!(
            "{}_{}_{}",
            normalize(&job.title),
            normalize(&job.company),
            normalize(&job.location)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Set of fingerprints admitted during one scrape.
#[derive(Debug, Default)]
pub struct DedupIndex {
    seen: HashSet<Fingerprint>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record; `false` if an equivalent one was already admitted.
    pub fn admit(&mut self, job: &JobRecord) -> bool {
        self.seen.insert(Fingerprint::of(job))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
