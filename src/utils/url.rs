// src/utils/url.rs

//! URL manipulation for result page cursors.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static PAGENO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pageno=(\d+)").expect("pageno pattern is valid"));

/// Append a numeric offset query parameter.
///
/// # Examples
/// ```
/// use jobsweep::utils::url::with_offset;
///
/// assert_eq!(
///     with_offset("https://in.indeed.com/jobs?q=rust", "start", 20),
///     "https://in.indeed.com/jobs?q=rust&start=20"
/// );
/// ```
pub fn with_offset(base: &str, param: &str, offset: u64) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{param}={offset}")
}

/// Guess the URL of the page after `current` from common URL shapes.
///
/// Tried in order: a `pageno=<n>` parameter is incremented; a trailing
/// `-<page>` on the last path segment becomes `-<page + 1>`; a last segment
/// without digits gets `-<page + 1>` appended. `page` is the 1-based index of
/// the current page.
pub fn synthesize_next(current: &str, page: usize) -> Option<String> {
    if let Some(caps) = PAGENO.captures(current) {
        let n: u64 = caps.get(1)?.as_str().parse().ok()?;
        return Some(
            PAGENO
                .replace(current, format!("pageno={}", n + 1))
                .into_owned(),
        );
    }

    let mut url = Url::parse(current).ok()?;
    let mut segments: Vec<String> = url.path_segments()?.map(str::to_string).collect();
    let last = segments.last_mut().filter(|s| !s.is_empty())?;

    let suffix = format!("-{page}");
    if let Some(stem) = last.strip_suffix(&suffix) {
        *last = format!("{stem}-{}", page + 1);
    } else if !last.chars().any(|c| c.is_ascii_digit()) {
        last.push_str(&format!("-{}", page + 1));
    } else {
        return None;
    }

    url.set_path(&format!("/{}", segments.join("/")));
    Some(url.to_string())
}
