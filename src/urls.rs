// src/urls.rs
// =============================================================================
// URL canonicalization and the same-domain filter.
//
// Two links point at the same page if they only differ by:
// - a fragment (#section) or a query string (?a=b)
// - a leading "www." on the host
// - a trailing slash on the path
// - the scheme (http vs https)
//
// So every URL the crawler touches is first turned into a CanonicalUrl, and
// pages are identified by `host + path` (the dedup key).
//
// Rust concepts:
// - Newtypes: CanonicalUrl wraps url::Url so only canonical URLs can exist
// - Result<T, E>: canonicalize() fails with InvalidUrl for unusable links
// =============================================================================

use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;
use url::{ParseError, Url};

/// A link that could not be turned into a crawlable canonical URL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid URL '{raw}': {reason}")]
pub struct InvalidUrl {
    pub raw: String,
    pub reason: String,
}

impl InvalidUrl {
    fn new(raw: &str, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

// An absolute http(s) URL with no fragment, no query, no "www." prefix and a
// path ending in '/'. Equality and hashing go through key(), so the http and
// https versions of a page are the same CanonicalUrl.
#[derive(Debug, Clone)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Parses a root URL given by the user.
    ///
    /// Stricter than following a link: there is no page to resolve against,
    /// so the input must already be absolute http(s) with a host and a path.
    pub fn parse_root(raw: &str) -> Result<Self, InvalidUrl> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed).map_err(|e| InvalidUrl::new(raw, e.to_string()))?;
        Self::from_absolute(trimmed, url)
    }

    /// Deduplication key: `host[:port] + path`, independent of the scheme
    pub fn key(&self) -> String {
        format!("{}{}", self.host(), self.0.path())
    }

    /// Host including a non-default port, "www." already stripped
    pub fn host(&self) -> String {
        let host = self.0.host_str().unwrap_or_default();
        match self.0.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn from_absolute(raw: &str, mut url: Url) -> Result<Self, InvalidUrl> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(InvalidUrl::new(raw, format!("unsupported scheme '{}'", url.scheme())));
        }

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(InvalidUrl::new(raw, "missing host")),
        };

        // The url crate always normalizes an http path to at least "/", so an
        // empty path has to be spotted in the raw text.
        if has_empty_path(raw) {
            return Err(InvalidUrl::new(raw, "link has no path"));
        }

        url.set_fragment(None);
        url.set_query(None);

        if let Some(stripped) = host.strip_prefix("www.") {
            url.set_host(Some(stripped))
                .map_err(|e| InvalidUrl::new(raw, e.to_string()))?;
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self(url))
    }
}

impl PartialEq for CanonicalUrl {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for CanonicalUrl {}

impl Hash for CanonicalUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

// Turns a raw href found on `base` into a CanonicalUrl
//
// Examples (base = https://a.com/docs/):
//   "/about"                  -> https://a.com/about/
//   "http://www.a.com/x?y=1"  -> http://a.com/x/
//   "guide#intro"             -> https://a.com/docs/guide/
//   "mailto:me@a.com"         -> InvalidUrl
//   "https://test.com"        -> InvalidUrl (no path)
pub fn canonicalize(raw: &str, base: &CanonicalUrl) -> Result<CanonicalUrl, InvalidUrl> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidUrl::new(raw, "empty link"));
    }

    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        // Relative link, resolve it against the page it was found on
        Err(ParseError::RelativeUrlWithoutBase) => base
            .as_url()
            .join(trimmed)
            .map_err(|e| InvalidUrl::new(raw, e.to_string()))?,
        Err(e) => return Err(InvalidUrl::new(raw, e.to_string())),
    };

    CanonicalUrl::from_absolute(trimmed, url)
}

// True when the authority of an absolute or protocol-relative URL is followed
// directly by nothing, a query or a fragment.
fn has_empty_path(raw: &str) -> bool {
    let authority = if let Some(rest) = raw.strip_prefix("//") {
        rest
    } else {
        match raw.split_once("://") {
            Some((scheme, rest)) if is_scheme(scheme) => rest,
            _ => return false,
        }
    };

    match authority.find(&['/', '?', '#'][..]) {
        Some(idx) => !authority[idx..].starts_with('/'),
        None => true,
    }
}

fn is_scheme(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
}

/// The registered domain a crawl session is confined to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    host: String,
}

impl Domain {
    pub fn of(root: &CanonicalUrl) -> Self {
        Self {
            host: root.as_url().host_str().unwrap_or_default().to_string(),
        }
    }

    // Suffix match, so blog.a.com counts as part of a.com
    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        url.as_url()
            .host_str()
            .map(|host| host.ends_with(&self.host))
            .unwrap_or(false)
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CanonicalUrl {
        CanonicalUrl::parse_root("https://monzo.com/").unwrap()
    }

    #[test]
    fn test_path_absolute_link_uses_base_host() {
        let url = canonicalize("/i-am-a-page-in-monzo-com#weirdfragment", &base()).unwrap();
        assert_eq!(url.as_str(), "https://monzo.com/i-am-a-page-in-monzo-com/");
    }

    #[test]
    fn test_query_and_fragment_are_dropped() {
        let url = canonicalize(
            "https://bla.com/i-am-a-totally-legit-link?what=didntexpectthis",
            &base(),
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://bla.com/i-am-a-totally-legit-link/");
        assert_eq!(url.as_url().query(), None);
    }

    #[test]
    fn test_www_prefix_is_stripped() {
        let url = canonicalize("https://www.bla.com/the-www-should-go-away", &base()).unwrap();
        assert_eq!(url.host(), "bla.com");
        assert_eq!(url.key(), "bla.com/the-www-should-go-away/");
    }

    #[test]
    fn test_link_without_path_is_invalid() {
        assert!(canonicalize("https://test.com", &base()).is_err());
        assert!(canonicalize("https://test.com?q=1", &base()).is_err());
        assert!(canonicalize("https://test.com/", &base()).is_ok());
    }

    #[test]
    fn test_key_ignores_scheme_and_www() {
        let a = canonicalize("http://www.a.com/x", &base()).unwrap();
        let b = canonicalize("https://a.com/x/", &base()).unwrap();
        assert_eq!(a.key(), "a.com/x/");
        assert_eq!(b.key(), "a.com/x/");
        assert_eq!(a, b);
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize("http://www.a.com/x?y=2#z", &base()).unwrap();
        let twice = canonicalize(once.as_str(), &base()).unwrap();
        assert_eq!(once.as_str(), twice.as_str());
    }

    #[test]
    fn test_relative_link_resolves_against_page() {
        let page = CanonicalUrl::parse_root("https://a.com/docs/").unwrap();
        let url = canonicalize("guide#intro", &page).unwrap();
        assert_eq!(url.as_str(), "https://a.com/docs/guide/");
    }

    #[test]
    fn test_url_inside_query_is_not_mistaken_for_authority() {
        let url = canonicalize("/redirect?to=https://other.com", &base()).unwrap();
        assert_eq!(url.as_str(), "https://monzo.com/redirect/");
    }

    #[test]
    fn test_non_http_links_are_rejected() {
        assert!(canonicalize("mailto:test@example.com", &base()).is_err());
        assert!(canonicalize("javascript:void(0)", &base()).is_err());
        assert!(canonicalize("   ", &base()).is_err());
    }

    #[test]
    fn test_port_is_part_of_the_key() {
        let url = CanonicalUrl::parse_root("http://127.0.0.1:8080/a").unwrap();
        assert_eq!(url.key(), "127.0.0.1:8080/a/");
    }

    #[test]
    fn test_domain_suffix_match() {
        let domain = Domain::of(&CanonicalUrl::parse_root("https://www.a.com/").unwrap());
        assert_eq!(domain.host(), "a.com");

        let sub = canonicalize("https://blog.a.com/post", &base()).unwrap();
        let other = canonicalize("https://other.com/x", &base()).unwrap();
        assert!(domain.contains(&sub));
        assert!(!domain.contains(&other));
    }
}
