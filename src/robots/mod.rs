//! Robots.txt handling module
//!
//! This module fetches, parses and caches robots.txt per origin so the
//! crawler can skip disallowed URLs and honor Crawl-delay.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::RobotsRules;

use crate::crawler::{ContentKind, FetchFailure, Fetcher};

/// Fetches robots.txt for an origin (`scheme://host[:port]`)
///
/// A missing file (4xx) or any fetch failure yields [`RobotsRules::allow_all`].
pub async fn fetch_robots(fetcher: &Fetcher, origin: &str) -> RobotsRules {
    let robots_url = match url::Url::parse(&format!("{}/robots.txt", origin)) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL for {}: {}", origin, e);
            return RobotsRules::allow_all();
        }
    };

    match fetcher.fetch(&robots_url).await {
        // Some servers answer robots.txt with an HTML error page
        Ok(content) if content.content_kind == ContentKind::Html => RobotsRules::allow_all(),
        Ok(content) => {
            tracing::debug!("Loaded robots.txt for {}", origin);
            RobotsRules::from_content(&content.text())
        }
        Err(e) if matches!(e.reason, FetchFailure::Status(code) if (400..500).contains(&code)) => {
            tracing::debug!("No robots.txt for {} ({})", origin, e.reason);
            RobotsRules::allow_all()
        }
        Err(e) => {
            tracing::warn!("Could not fetch robots.txt for {}: {}", origin, e.reason);
            RobotsRules::allow_all()
        }
    }
}
