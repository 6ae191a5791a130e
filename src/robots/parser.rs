//! Robots.txt rules, matched with the robotstxt crate

use robotstxt::DefaultMatcher;
use std::time::Duration;
use url::Url;

/// Rules from one origin's robots.txt
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    /// Raw body; empty means everything is allowed
    content: String,
}

impl RobotsRules {
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Rules used when robots.txt is missing or unreachable
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Checks whether `agent` (a product token such as "UniScrape") may fetch `url`
    pub fn is_allowed(&self, url: &Url, agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, agent, url.as_str())
    }

    /// Crawl-delay for `agent`, preferring its own group over `*`
    ///
    /// Values that do not fit a `Duration` are ignored.
    pub fn crawl_delay(&self, agent: &str) -> Option<Duration> {
        let agent = agent.to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut group_has_rules = false;
        let mut specific = None;
        let mut wildcard = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                // A user-agent line after rules starts a new group
                if group_has_rules {
                    group.clear();
                    group_has_rules = false;
                }
                group.push(value.to_lowercase());
                continue;
            }

            group_has_rules = true;
            if key != "crawl-delay" {
                continue;
            }

            let Some(delay) = value
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d >= 0.0)
            else {
                continue;
            };

            if group.iter().any(|ua| ua != "*" && agent.contains(ua.as_str())) {
                specific = Some(delay);
            } else if group.iter().any(|ua| ua == "*") {
                wildcard = Some(delay);
            }
        }

        specific
            .or(wildcard)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}
