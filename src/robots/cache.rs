//! Per-origin robots.txt cache
//!
//! robots.txt is fetched at most once per origin per run.

use crate::crawler::Fetcher;
use crate::robots::{fetch_robots, RobotsRules};
use crate::url::origin_of;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub struct RobotsCache {
    rules: HashMap<String, RobotsRules>,
    /// Upper bound applied to any Crawl-delay a site asks for
    max_delay: Duration,
}

impl RobotsCache {
    pub fn new(max_delay: Duration) -> Self {
        Self {
            rules: HashMap::new(),
            max_delay,
        }
    }

    /// Returns the rules for the URL's origin, fetching them on first use
    ///
    /// When robots.txt is fetched for a new origin and declares a Crawl-delay
    /// for `agent`, the fetcher's delay for that host is raised to it, capped
    /// at `max-crawl-delay`.
    pub async fn rules_for(
        &mut self,
        fetcher: &Fetcher,
        url: &Url,
        agent: &str,
    ) -> &RobotsRules {
        let origin = origin_of(url);

        if !self.rules.contains_key(&origin) {
            let rules = fetch_robots(fetcher, &origin).await;
            if let (Some(asked), Some(host)) = (rules.crawl_delay(agent), url.host_str()) {
                let delay = asked.min(self.max_delay);
                if delay < asked {
                    tracing::warn!(
                        "{} asks for a crawl delay of {:?}, capping at {:?}",
                        origin,
                        asked,
                        delay
                    );
                } else {
                    tracing::info!("{} asks for a crawl delay of {:?}", origin, delay);
                }
                fetcher.set_host_delay(&host.to_lowercase(), delay);
            }
            self.rules.insert(origin.clone(), rules);
        }

        self.rules.entry(origin).or_default()
    }
}
