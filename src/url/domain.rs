use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use uniscrape::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Names the institution that published a URL: its host without a `www.` prefix
pub fn institution_of(url: &Url) -> Option<String> {
    extract_domain(url).map(|host| match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}

/// Returns the `scheme://host[:port]` origin of a URL, used to key per-site state
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_institution_strips_www() {
        let url = Url::parse("https://www.uni.wroc.pl/rekrutacja").unwrap();
        assert_eq!(institution_of(&url), Some("uni.wroc.pl".to_string()));
    }

    #[test]
    fn test_institution_keeps_other_subdomains() {
        let url = Url::parse("https://cs.uni.wroc.pl/").unwrap();
        assert_eq!(institution_of(&url), Some("cs.uni.wroc.pl".to_string()));
    }

    #[test]
    fn test_origin_includes_port() {
        let url = Url::parse("http://127.0.0.1:4321/a/b").unwrap();
        assert_eq!(origin_of(&url), "http://127.0.0.1:4321");
    }
}
