//! Integration tests for UniScrape
//!
//! Mock servers stand in for the crawled sites; every test works inside its
//! own temporary directory.

mod cli_tests;
mod common;
mod crawl_tests;
mod pipeline_tests;
