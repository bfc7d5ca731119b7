// src/fetch/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Copes with malformed markup the way browsers do (it's built on html5ever)
//
// Each href is canonicalized relative to the page it was found on. Links that
// can't be canonicalized (mailto:, javascript:, no path, ...) are skipped here,
// they never reach the crawl queue.
// =============================================================================

use std::collections::HashSet;

use scraper::{Html, Selector};
use tracing::trace;

use crate::urls::{canonicalize, CanonicalUrl};

// Extracts every crawlable link from an HTML document
//
// Parameters:
//   html: the HTML content to parse
//   page: the canonical URL of the page (for resolving relative links)
//
// Returns: the set of canonical URLs linked from the page (any domain)
pub fn extract_html_links(html: &str, page: &CanonicalUrl) -> HashSet<CanonicalUrl> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant, known-valid selector
    let selector = Selector::parse("a[href]").expect("static selector is valid");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| match canonicalize(href, page) {
            Ok(url) => Some(url),
            Err(e) => {
                trace!(page = %page, error = %e, "skipping link");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> CanonicalUrl {
        CanonicalUrl::parse_root("https://example.com/page/").unwrap()
    }

    fn keys(links: &HashSet<CanonicalUrl>) -> Vec<String> {
        let mut keys: Vec<String> = links.iter().map(|u| u.key()).collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_empty_document() {
        assert!(extract_html_links("", &page()).is_empty());
    }

    #[test]
    fn test_relative_and_absolute_links() {
        let html = r#"
            <a href="https://rust-lang.org/learn">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = extract_html_links(html, &page());
        assert_eq!(
            keys(&links),
            vec!["example.com/about/", "example.com/docs/", "rust-lang.org/learn/"]
        );
    }

    #[test]
    fn test_anchor_without_href_is_ignored() {
        let html = r#"<html><body><p><a f="hithere">Hi</a></p></body></html>"#;
        assert!(extract_html_links(html, &page()).is_empty());
    }

    #[test]
    fn test_malformed_html_still_yields_links() {
        let html = r#"<htm><body<p><a href="/hithere">Hi</a><p></body>/html>"#;
        let links = extract_html_links(html, &page());
        assert_eq!(keys(&links), vec!["example.com/hithere/"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let html = r#"
            <a href="/docs">Docs</a>
            <a href="/docs/#install">Install</a>
            <a href="http://www.example.com/docs?lang=en">Docs (en)</a>
        "#;
        assert_eq!(extract_html_links(html, &page()).len(), 1);
    }

    #[test]
    fn test_skip_mailto() {
        let html = r#"<a href="mailto:test@example.com">Email</a>"#;
        assert!(extract_html_links(html, &page()).is_empty());
    }
}
