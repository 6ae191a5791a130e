//! HTTP fetcher implementation
//!
//! This module handles all content retrieval, including:
//! - Building the HTTP client with the configured user agent
//! - GET requests with retry and exponential backoff for transient failures
//! - Per-host politeness spacing between requests
//! - Content-type classification (HTML, PDF, unknown)
//! - Reading local PDF files

use crate::config::Config;
use crate::crawler::scheduler::Throttle;
use crate::url::extract_domain;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Kind of content behind a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Pdf,
    Unknown,
}

impl ContentKind {
    /// Classifies content from its `Content-Type`, falling back to sniffing
    ///
    /// Sniffing looks at the `%PDF-` magic, a `.pdf` path suffix and a leading
    /// `<html` or `<!doctype`.
    pub fn classify(content_type: Option<&str>, url: &Url, bytes: &[u8]) -> Self {
        if let Some(kind) = content_type.and_then(Self::from_mime) {
            return kind;
        }

        if bytes.starts_with(b"%PDF-") {
            return Self::Pdf;
        }

        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
        let head = head.trim_start().to_ascii_lowercase();
        if head.starts_with("<!doctype") || head.starts_with("<html") {
            return Self::Html;
        }

        if crate::url::looks_like_pdf(url) {
            return Self::Pdf;
        }

        Self::Unknown
    }

    fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "text/html" | "application/xhtml+xml" => Some(Self::Html),
            "application/pdf" | "application/x-pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Unknown => "unknown",
        }
    }
}

/// Successfully retrieved content for one URL
#[derive(Debug, Clone)]
pub struct FetchedContent {
    /// The URL that was requested
    pub url: Url,
    /// URL after redirects
    pub final_url: Url,
    pub status: u16,
    pub content_kind: ContentKind,
    pub bytes: Vec<u8>,
}

impl FetchedContent {
    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("redirect error: {0}")]
    Redirect(String),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("failed to read file: {0}")]
    Io(String),
}

impl FetchFailure {
    /// Transient failures are worth retrying: timeouts, connection errors,
    /// HTTP 5xx and HTTP 429
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Connect(_) => true,
            Self::Status(code) => *code == 429 || (500..600).contains(code),
            Self::InvalidUrl(_) | Self::Redirect(_) | Self::Body(_) | Self::Io(_) => false,
        }
    }

    fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_redirect() {
            Self::Redirect(e.to_string())
        } else if e.is_builder() {
            Self::InvalidUrl(e.to_string())
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else {
            Self::Connect(e.to_string())
        }
    }
}

/// A failed fetch of one URL
#[derive(Debug, Clone, Error)]
#[error("Failed to fetch {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: FetchFailure,
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        self.reason.is_transient()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The full configuration (user agent and fetcher sections)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.fetcher.timeout))
        .connect_timeout(Duration::from_secs(config.fetcher.timeout))
        .redirect(Policy::limited(10))
        .danger_accept_invalid_certs(config.fetcher.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves content over HTTP with retries and politeness spacing
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    throttle: Throttle,
    max_retries: u32,
    retry_backoff: Duration,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            throttle: Throttle::new(Duration::from_millis(config.crawler.request_delay)),
            max_retries: config.fetcher.max_retries,
            retry_backoff: Duration::from_millis(config.fetcher.retry_backoff),
        })
    }

    /// Raises the politeness delay for one host (robots.txt Crawl-delay)
    pub fn set_host_delay(&self, host: &str, delay: Duration) {
        self.throttle.set_host_delay(host, delay);
    }

    /// Current politeness delay for one host
    pub fn host_delay(&self, host: &str) -> Duration {
        self.throttle.host_delay(host)
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Timeout, connection error | Retry up to `max-retries` times |
    /// | HTTP 5xx, HTTP 429 | Retry up to `max-retries` times |
    /// | Other 4xx, invalid URL | Fail immediately |
    ///
    /// The wait before retry `n` (starting at 0) is `retry-backoff * 2^n`.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedContent, FetchError> {
        let host = extract_domain(url).ok_or_else(|| FetchError {
            url: url.to_string(),
            reason: FetchFailure::InvalidUrl("URL has no host".to_string()),
        })?;

        let mut attempt = 0;
        loop {
            self.throttle.wait_turn(&host).await;

            match self.fetch_once(url).await {
                Ok(content) => {
                    tracing::debug!(
                        "Fetched {} ({}, {} bytes)",
                        content.final_url,
                        content.content_kind.as_str(),
                        content.bytes.len()
                    );
                    return Ok(content);
                }
                Err(reason) if reason.is_transient() && attempt < self.max_retries => {
                    let backoff = self.retry_backoff * 2u32.saturating_pow(attempt);
                    tracing::warn!(
                        "Fetching {} failed ({}), retry {}/{} in {:?}",
                        url,
                        reason,
                        attempt + 1,
                        self.max_retries,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(reason) => {
                    return Err(FetchError {
                        url: url.to_string(),
                        reason,
                    });
                }
            }
        }
    }

    async fn fetch_once(&self, url: &Url) -> Result<FetchedContent, FetchFailure> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchFailure::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchFailure::Body(e.to_string()))?
            .to_vec();

        Ok(FetchedContent {
            content_kind: ContentKind::classify(content_type.as_deref(), &final_url, &bytes),
            url: url.clone(),
            final_url,
            status: status.as_u16(),
            bytes,
        })
    }
}

/// Reads a local PDF from disk
pub async fn read_local_file(path: &Path) -> Result<Vec<u8>, FetchError> {
    tokio::fs::read(path).await.map_err(|e| FetchError {
        url: path.display().to_string(),
        reason: FetchFailure::Io(e.to_string()),
    })
}
