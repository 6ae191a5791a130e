//! Configuration module for UniScrape
//!
//! This module handles loading, parsing, and validating the TOML
//! configuration file, and reading secrets from the environment.
//!
//! # Example
//!
//! ```no_run
//! use uniscrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("uniscrape.toml")).unwrap();
//! println!("Crawler will fetch at most {:?} pages", config.crawler.max_pages);
//! ```

mod parser;
mod secrets;
mod types;
mod validation;

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "uniscrape.toml";

pub use types::{
    AiConfig, Config, CrawlerConfig, ExtractionConfig, FetcherConfig, OutputConfig, PathsConfig,
    SinkKind, UserAgentConfig,
};

pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, resolve_config,
};
pub use secrets::{Secrets, AI_SERVICE_KEY, DOCUMENT_STORE_KEY};
