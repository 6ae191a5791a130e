//! Crawler module for fetching and link discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic and content classification
//! - HTML parsing and link extraction
//! - The FIFO frontier and per-host politeness
//! - Breadth-first crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{CrawlStats, CrawlStep, CrawledPage, Crawler};
pub use fetcher::{
    build_http_client, read_local_file, ContentKind, FetchError, FetchFailure, FetchedContent,
    Fetcher,
};
pub use parser::{page_title, parse_html, ParsedPage};
pub use scheduler::{Frontier, Throttle};
