//! URL handling module for UniScrape
//!
//! This module provides URL normalization, domain extraction, URL entries
//! carried through the frontier, and the same-domain crawl scope.

mod domain;
mod normalize;

use crate::config::CrawlerConfig;
use std::collections::HashSet;
use url::Url;

pub use domain::{extract_domain, institution_of, origin_of};
pub use normalize::normalize_url;

/// Where a URL entered the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlOrigin {
    /// Listed in the seed file
    Seed,
    /// Found as a link while crawling
    Discovered,
}

/// A normalized URL plus its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    pub url: Url,
    pub origin: UrlOrigin,
    /// Link distance from the nearest seed (0 for seeds)
    pub depth: u32,
}

impl UrlEntry {
    pub fn seed(url: Url) -> Self {
        Self {
            url,
            origin: UrlOrigin::Seed,
            depth: 0,
        }
    }

    pub fn discovered(url: Url, depth: u32) -> Self {
        Self {
            url,
            origin: UrlOrigin::Discovered,
            depth,
        }
    }

    /// The Visited Record key for this entry
    pub fn key(&self) -> &str {
        self.url.as_str()
    }
}

/// Returns true when the URL path names a PDF file
pub fn looks_like_pdf(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}

/// Checks if a domain matches a wildcard pattern
///
/// "example.com" matches only itself; "*.example.com" matches the bare domain
/// and any subdomain.
///
/// ```
/// use uniscrape::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.example.com", "example.com"));
/// assert!(matches_wildcard("*.example.com", "api.v2.example.com"));
/// assert!(!matches_wildcard("*.example.com", "myexample.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

/// Decides which hosts a crawl may follow links into
#[derive(Debug, Clone)]
pub struct DomainScope {
    restricted: bool,
    hosts: HashSet<String>,
    patterns: Vec<String>,
}

impl DomainScope {
    /// Builds the scope from the seed hosts and the crawler configuration
    pub fn new<'a, I>(seeds: I, config: &CrawlerConfig) -> Self
    where
        I: IntoIterator<Item = &'a Url>,
    {
        Self {
            restricted: config.same_domain,
            hosts: seeds.into_iter().filter_map(extract_domain).collect(),
            patterns: config
                .allowed_domains
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    pub fn allows(&self, url: &Url) -> bool {
        if !self.restricted {
            return true;
        }

        let Some(host) = extract_domain(url) else {
            return false;
        };

        self.hosts.contains(&host) || self.patterns.iter().any(|p| matches_wildcard(p, &host))
    }
}
