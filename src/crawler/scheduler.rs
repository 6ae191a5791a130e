//! Frontier queue and per-host politeness
//!
//! This module handles:
//! - FIFO ordering of URLs waiting to be fetched
//! - Dedup of URLs already queued or attempted during this run
//! - Minimum spacing between requests to the same host

use crate::url::UrlEntry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Breadth-first crawl frontier
///
/// Entries come out in the order they went in. A key is accepted once per
/// run; pushing it again is a no-op even after it has been popped.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<UrlEntry>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an entry unless its key was already seen this run
    ///
    /// # Returns
    ///
    /// * `true` - The entry was added to the back of the queue
    /// * `false` - The key was already queued or attempted
    pub fn push(&mut self, entry: UrlEntry) -> bool {
        if !self.seen.insert(entry.key().to_string()) {
            return false;
        }
        self.queue.push_back(entry);
        true
    }

    /// Records a key as seen without queueing it (e.g. a redirect target)
    pub fn mark_seen(&mut self, key: &str) -> bool {
        self.seen.insert(key.to_string())
    }

    pub fn pop(&mut self) -> Option<UrlEntry> {
        self.queue.pop_front()
    }

    /// Removes every queued entry in order; keys stay seen
    pub fn drain(&mut self) -> impl Iterator<Item = UrlEntry> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[derive(Debug)]
struct HostSlot {
    next_allowed: Instant,
    delay: Duration,
}

/// Spaces requests to the same host at least `delay` apart
///
/// Hosts start with the configured default delay. A robots.txt Crawl-delay
/// may raise it for one host but never lowers it below the default.
#[derive(Debug)]
pub struct Throttle {
    default_delay: Duration,
    hosts: Mutex<HashMap<String, HostSlot>>,
}

impl Throttle {
    pub fn new(default_delay: Duration) -> Self {
        Self {
            default_delay,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    /// Raises the delay for one host
    pub fn set_host_delay(&self, host: &str, delay: Duration) {
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        let default_delay = self.default_delay;
        let slot = hosts.entry(host.to_string()).or_insert_with(|| HostSlot {
            next_allowed: Instant::now(),
            delay: default_delay,
        });
        slot.delay = slot.delay.max(delay);
    }

    /// Current delay for a host
    pub fn host_delay(&self, host: &str) -> Duration {
        let hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        hosts
            .get(host)
            .map(|slot| slot.delay)
            .unwrap_or(self.default_delay)
    }

    /// Reserves the next request slot for a host and returns how long to wait
    ///
    /// The slot is reserved before the caller sleeps, so two callers never
    /// get the same slot.
    pub fn reserve(&self, host: &str, now: Instant) -> Duration {
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        let default_delay = self.default_delay;
        let slot = hosts.entry(host.to_string()).or_insert_with(|| HostSlot {
            next_allowed: now,
            delay: default_delay,
        });

        let start = slot.next_allowed.max(now);
        slot.next_allowed = start + slot.delay;
        start - now
    }

    /// Waits until a request to `host` is allowed
    pub async fn wait_turn(&self, host: &str) {
        let wait = self.reserve(host, Instant::now());
        if !wait.is_zero() {
            tracing::trace!("Waiting {:?} before next request to {}", wait, host);
            tokio::time::sleep(wait).await;
        }
    }
}
