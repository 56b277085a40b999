//! Utility functions and helpers.

pub mod url;

use ::url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Make a listing link absolute against a board origin.
///
/// Links already starting with `http` are returned untouched.
pub fn absolutize(origin: &Url, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http") {
        href.to_string()
    } else {
        resolve_url(origin, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/path/").unwrap();
        assert_eq!(
            resolve_url(&base, "page.html"),
            "https://example.com/path/page.html"
        );
        assert_eq!(
            resolve_url(&base, "/root.html"),
            "https://example.com/root.html"
        );
    }

    #[test]
    fn test_absolutize_relative() {
        let origin = Url::parse("https://in.indeed.com").unwrap();
        assert_eq!(
            absolutize(&origin, "/rc/clk?jk=1f2e"),
            "https://in.indeed.com/rc/clk?jk=1f2e"
        );
        assert_eq!(
            absolutize(&origin, "viewjob?jk=9"),
            "https://in.indeed.com/viewjob?jk=9"
        );
    }

    #[test]
    fn test_absolutize_keeps_absolute() {
        let origin = Url::parse("https://www.naukri.com").unwrap();
        let link = "https://careers.example.com/jobs/42?src=naukri";
        assert_eq!(absolutize(&origin, link), link);
    }
}
