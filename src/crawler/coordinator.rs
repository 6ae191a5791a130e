//! Crawler coordinator - breadth-first traversal from the seed URLs
//!
//! The crawler is pull-based: the caller asks for the next page, processes it
//! (stores it, extracts it, or just records it) and then marks it visited.
//! This module owns:
//! - The FIFO frontier and the in-run dedup guard
//! - Depth, page-count and domain boundaries
//! - robots.txt checks
//! - Link discovery on fetched HTML pages

use crate::config::Config;
use crate::crawler::parser::parse_html;
use crate::crawler::scheduler::Frontier;
use crate::crawler::{ContentKind, FetchError, FetchedContent, Fetcher};
use crate::robots::RobotsCache;
use crate::state::VisitedSet;
use crate::storage::StorageResult;
use crate::url::{normalize_url, DomainScope, UrlEntry, UrlOrigin};
use std::time::Duration;
use url::Url;

/// A page the crawler fetched successfully
#[derive(Debug, Clone)]
pub struct CrawledPage {
    pub entry: UrlEntry,
    pub content: FetchedContent,
    /// Links from this page that were new to the frontier
    pub new_links: usize,
}

/// One unit of crawl progress
#[derive(Debug)]
pub enum CrawlStep {
    Page(CrawledPage),
    Failed { entry: UrlEntry, error: FetchError },
}

/// Counters kept while crawling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Fetch attempts (successful or not)
    pub attempts: u32,
    /// URLs added to the frontier from page links
    pub links_enqueued: usize,
    /// In-scope links found on pages at `max-depth`, never queued
    pub beyond_depth: usize,
    /// Seeds skipped because they were already visited
    pub seeds_skipped: usize,
    /// URLs skipped because robots.txt disallows them
    pub robots_blocked: usize,
}

/// Breadth-first crawler over a FIFO frontier
pub struct Crawler {
    fetcher: Fetcher,
    robots: Option<RobotsCache>,
    robots_agent: String,
    frontier: Frontier,
    visited: VisitedSet,
    scope: DomainScope,
    max_depth: Option<u32>,
    max_pages: Option<u32>,
    /// Links past `max-depth`, kept for the discovered list
    beyond_depth: Vec<Url>,
    stats: CrawlStats,
}

impl Crawler {
    /// Creates a crawler seeded with `seeds`
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl boundaries and robots policy come from `[crawler]`
    /// * `fetcher` - Fetcher used for pages and robots.txt
    /// * `visited` - Visited Record consulted before enqueueing and updated by `mark_visited`
    /// * `seeds` - Normalized seed URLs in file order
    pub fn new(config: &Config, fetcher: Fetcher, visited: VisitedSet, seeds: &[Url]) -> Self {
        let mut frontier = Frontier::new();
        let mut stats = CrawlStats::default();

        for seed in seeds {
            if visited.contains(seed.as_str()) {
                tracing::info!("Skipping already visited seed {}", seed);
                stats.seeds_skipped += 1;
                continue;
            }
            frontier.push(UrlEntry::seed(seed.clone()));
        }

        Self {
            fetcher,
            robots: config.crawler.respect_robots_txt.then(|| {
                RobotsCache::new(Duration::from_secs(config.crawler.max_crawl_delay))
            }),
            robots_agent: config.user_agent.crawler_name.clone(),
            frontier,
            visited,
            scope: DomainScope::new(seeds, &config.crawler),
            max_depth: config.crawler.max_depth,
            max_pages: config.crawler.max_pages,
            beyond_depth: Vec::new(),
            stats,
        }
    }

    /// Fetches the next URL in frontier order
    ///
    /// Returns `None` once the frontier is empty or the page limit is reached.
    /// Fetch failures are returned as [`CrawlStep::Failed`] and never stop the
    /// traversal.
    pub async fn next_page(&mut self) -> Option<CrawlStep> {
        loop {
            if self.page_limit_reached() {
                return None;
            }

            let entry = self.frontier.pop()?;

            // A redirect may have visited this URL after it was queued
            if self.visited.contains(entry.key()) {
                continue;
            }

            if let Some(robots) = self.robots.as_mut() {
                let rules = robots
                    .rules_for(&self.fetcher, &entry.url, &self.robots_agent)
                    .await;
                if !rules.is_allowed(&entry.url, &self.robots_agent) {
                    tracing::info!("robots.txt disallows {}", entry.url);
                    self.stats.robots_blocked += 1;
                    continue;
                }
            }

            self.stats.attempts += 1;
            tracing::info!("Crawling {} (depth {})", entry.url, entry.depth);

            return match self.fetcher.fetch(&entry.url).await {
                Ok(content) => {
                    let new_links = self.discover_links(&entry, &content);
                    Some(CrawlStep::Page(CrawledPage {
                        entry,
                        content,
                        new_links,
                    }))
                }
                Err(error) => {
                    tracing::warn!("{}", error);
                    Some(CrawlStep::Failed { entry, error })
                }
            };
        }
    }

    fn page_limit_reached(&self) -> bool {
        let Some(max_pages) = self.max_pages else {
            return false;
        };
        if self.stats.attempts < max_pages {
            return false;
        }
        if !self.frontier.is_empty() {
            tracing::info!(
                "Page limit of {} reached with {} URL(s) still queued",
                max_pages,
                self.frontier.len()
            );
        }
        true
    }

    /// Enqueues the in-scope links of an HTML page
    ///
    /// Links one step past `max-depth` are not queued but are remembered for
    /// [`Crawler::drain_frontier`]. Traversal is breadth-first, so no later
    /// page can reach them at a lower depth.
    fn discover_links(&mut self, entry: &UrlEntry, content: &FetchedContent) -> usize {
        if let Ok(final_url) = normalize_url(content.final_url.as_str()) {
            self.frontier.mark_seen(final_url.as_str());
        }

        if content.content_kind != ContentKind::Html {
            return 0;
        }

        let depth = entry.depth + 1;
        let past_max_depth = self.max_depth.is_some_and(|max| depth > max);
        let page = parse_html(&content.text(), &content.final_url);
        let mut added = 0;

        for link in page.links {
            let Ok(url) = normalize_url(link.as_str()) else {
                continue;
            };
            if !self.scope.allows(&url) || self.visited.contains(url.as_str()) {
                continue;
            }
            if past_max_depth {
                if self.frontier.mark_seen(url.as_str()) {
                    self.beyond_depth.push(url);
                    self.stats.beyond_depth += 1;
                }
            } else if self.frontier.push(UrlEntry::discovered(url, depth)) {
                added += 1;
            }
        }

        self.stats.links_enqueued += added;
        tracing::debug!("{} new link(s) from {}", added, content.final_url);
        added
    }

    /// Records a processed page in the Visited Record
    ///
    /// Both the requested URL and the post-redirect URL are recorded.
    pub fn mark_visited(&mut self, page: &CrawledPage) -> StorageResult<()> {
        self.visited.insert(page.entry.key())?;
        if let Ok(final_url) = normalize_url(page.content.final_url.as_str()) {
            self.visited.insert(final_url.as_str())?;
        }
        Ok(())
    }

    pub fn stats(&self) -> CrawlStats {
        self.stats
    }

    /// URLs still waiting in the frontier
    pub fn queued(&self) -> usize {
        self.frontier.len()
    }

    /// Takes every discovered URL the crawl never fetched
    ///
    /// These are the links still queued when the page limit stopped the
    /// traversal, followed by the links found past `max-depth`. Seeds and
    /// URLs visited since they were queued are left out.
    pub fn drain_frontier(&mut self) -> Vec<Url> {
        let mut unfetched: Vec<Url> = self
            .frontier
            .drain()
            .filter(|entry| entry.origin == UrlOrigin::Discovered)
            .filter(|entry| !self.visited.contains(entry.key()))
            .map(|entry| entry.url)
            .collect();
        unfetched.append(&mut self.beyond_depth);
        unfetched
    }
}
