use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for UniScrape
///
/// Every section is optional; missing keys fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub extraction: ExtractionConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub ai: AiConfig,
}

/// Crawl boundary and politeness configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link distance from a seed; unbounded when absent
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Maximum number of pages fetched per run; unbounded when absent
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Only follow links to the seed hosts (and `allowed-domains`)
    #[serde(rename = "same-domain")]
    pub same_domain: bool,

    /// Extra domain patterns (e.g. "*.example.com") that may be crawled
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Fetch and obey robots.txt for every crawled origin
    #[serde(rename = "respect-robots-txt")]
    pub respect_robots_txt: bool,

    /// Minimum time between two requests to the same host (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Longest robots.txt Crawl-delay honored (seconds); larger values are capped
    #[serde(rename = "max-crawl-delay")]
    pub max_crawl_delay: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_pages: Some(30),
            same_domain: true,
            allowed_domains: Vec::new(),
            respect_robots_txt: true,
            request_delay: 3000,
            max_crawl_delay: 60,
        }
    }
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Request timeout (seconds)
    pub timeout: u64,

    /// Retries for transient failures (timeouts, connection errors, 5xx, 429)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base backoff between retries (milliseconds), doubled per attempt
    #[serde(rename = "retry-backoff")]
    pub retry_backoff: u64,

    /// Skip TLS certificate verification
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            max_retries: 2,
            retry_backoff: 3000,
            accept_invalid_certs: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "UniScrape".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Text extraction settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Documents with less text than this (characters) are skipped
    #[serde(rename = "min-text-length")]
    pub min_text_length: usize,

    /// Language tag recorded on every document
    pub language: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: 100,
            language: "pl".to_string(),
        }
    }
}

/// Input and bookkeeping file locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Seed list, one URL per row
    #[serde(rename = "seed-file")]
    pub seed_file: PathBuf,

    /// Directory with local PDFs for `--pdf`
    #[serde(rename = "pdf-dir")]
    pub pdf_dir: PathBuf,

    /// Visited record for scraping modes
    #[serde(rename = "visited-file")]
    pub visited_file: PathBuf,

    /// Visited record for crawl-only runs
    #[serde(rename = "crawled-file")]
    pub crawled_file: PathBuf,

    /// Visited record for `--pdf`
    #[serde(rename = "visited-pdfs-file")]
    pub visited_pdfs_file: PathBuf,

    /// Where `--crawl` writes the URLs it discovered
    #[serde(rename = "discovered-file")]
    pub discovered_file: PathBuf,

    /// Append-only log of failed fetches
    #[serde(rename = "failure-log")]
    pub failure_log: PathBuf,

    /// Append-only run log
    #[serde(rename = "log-file")]
    pub log_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            seed_file: PathBuf::from("to_scrape/urls_to_scrape.csv"),
            pdf_dir: PathBuf::from("to_scrape/pdfs"),
            visited_file: PathBuf::from("visited/visited_urls.csv"),
            crawled_file: PathBuf::from("visited/crawled_urls.csv"),
            visited_pdfs_file: PathBuf::from("visited/visited_pdfs.csv"),
            discovered_file: PathBuf::from("to_scrape/discovered_urls.csv"),
            failure_log: PathBuf::from("logs/failed_urls.tsv"),
            log_file: PathBuf::from("logs/app_log.log"),
        }
    }
}

/// Where extracted documents go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// One JSON file per document
    #[default]
    Files,
    /// SQLite document store addressed by `DOCUMENT_STORE_KEY`
    Database,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub sink: SinkKind,

    /// Directory for the `files` sink
    #[serde(rename = "documents-dir")]
    pub documents_dir: PathBuf,

    /// Optional markdown run summary
    #[serde(rename = "summary-path")]
    pub summary_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::Files,
            documents_dir: PathBuf::from("output/documents"),
            summary_path: None,
        }
    }
}

/// Optional AI cleanup of extracted PDF text
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,

    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,

    pub model: String,

    /// Texts longer than this (characters) are sent in pieces
    #[serde(rename = "max-chunk-chars")]
    pub max_chunk_chars: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_chunk_chars: 12_000,
        }
    }
}
