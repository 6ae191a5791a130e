use crate::config::types::{
    AiConfig, Config, CrawlerConfig, ExtractionConfig, FetcherConfig, OutputConfig, PathsConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_extraction_config(&config.extraction)?;
    validate_paths_config(&config.paths)?;
    validate_output_config(&config.output)?;
    validate_ai_config(&config.ai)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.max_crawl_delay > 3600 {
        return Err(ConfigError::Validation(format!(
            "max-crawl-delay must be at most 3600s, got {}s",
            config.max_crawl_delay
        )));
    }

    for pattern in &config.allowed_domains {
        validate_domain_pattern(pattern)?;
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            config.timeout
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be between 0 and 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // The name doubles as the robots.txt product token
    let name = &config.crawler_name;
    let is_token_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if name.is_empty() || !name.chars().all(is_token_char) {
        return Err(ConfigError::Validation(format!(
            "crawler-name must be a non-empty token of letters, digits, '-' or '_', got '{}'",
            name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("contact-url '{}': {}", contact, e)))?;
    }

    Ok(())
}

fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "language cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_paths_config(config: &PathsConfig) -> Result<(), ConfigError> {
    let named = [
        ("seed_file", &config.seed_file),
        ("pdf_dir", &config.pdf_dir),
        ("visited_file", &config.visited_file),
        ("crawled_file", &config.crawled_file),
        ("visited_pdfs_file", &config.visited_pdfs_file),
        ("discovered_file", &config.discovered_file),
        ("failure_log", &config.failure_log),
        ("log_file", &config.log_file),
    ];

    for (name, path) in named {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    // Sharing a visited file between modes would let a crawl hide pages from a scrape
    if config.visited_file == config.crawled_file {
        return Err(ConfigError::Validation(
            "visited_file and crawled_file must differ".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.documents_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "documents_dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_ai_config(config: &AiConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid ai endpoint: {}", e)))?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("ai model cannot be empty".to_string()));
    }

    if config.max_chunk_chars < 500 {
        return Err(ConfigError::Validation(format!(
            "max_chunk_chars must be >= 500, got {}",
            config.max_chunk_chars
        )));
    }

    Ok(())
}

/// Checks an `allowed-domains` entry; a leading `*.` matches any subdomain
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    let host = pattern.strip_prefix("*.").unwrap_or(pattern);
    if host.is_empty() {
        return Err(ConfigError::InvalidPattern(format!(
            "'{}' names no host",
            pattern
        )));
    }

    for label in host.split('.') {
        let well_formed = !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-');
        if !well_formed {
            return Err(ConfigError::InvalidPattern(format!(
                "'{}' has a malformed label '{}'",
                pattern, label
            )));
        }
    }

    Ok(())
}
