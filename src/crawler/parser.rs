//! Link and title extraction from HTML pages
//!
//! # Link Rules
//!
//! Followed: `<a href>` anywhere in the document and `<link rel="canonical">`.
//! Skipped: `download` anchors, `javascript:`, `mailto:`, `tel:` and `data:`
//! hrefs, fragment-only anchors, and anything that does not resolve to
//! http(s). `rel="nofollow"` links are followed.

use scraper::{Html, Selector};
use url::Url;

/// Crawl-relevant parts of an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// `og:title`, else `<title>`
    pub title: Option<String>,

    /// Absolute http(s) links in document order, duplicates included
    pub links: Vec<Url>,
}

/// Parses an HTML page, resolving links against `base_url`
///
/// Malformed markup never fails; the parser recovers what it can.
///
/// ```
/// use uniscrape::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<title>Rekrutacja</title><a href="/oplaty">Opłaty</a>"#;
/// let base = Url::parse("https://uni.edu/rekrutacja").unwrap();
/// let page = parse_html(html, &base);
/// assert_eq!(page.title.as_deref(), Some("Rekrutacja"));
/// assert_eq!(page.links[0].as_str(), "https://uni.edu/oplaty");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);
    ParsedPage {
        title: page_title(&document),
        links: collect_links(&document, base_url),
    }
}

/// Title of a parsed document: `og:title` first, then `<title>`
pub fn page_title(document: &Html) -> Option<String> {
    let og_title = Selector::parse(r#"meta[property="og:title"][content]"#)
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .filter_map(|el| el.value().attr("content"))
                .map(collapse_whitespace)
                .find(|t| !t.is_empty())
        });

    og_title.or_else(|| {
        let selector = Selector::parse("title").ok()?;
        document
            .select(&selector)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .find(|t| !t.is_empty())
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(anchors) = Selector::parse("a[href]") {
        links.extend(
            document
                .select(&anchors)
                .filter(|el| el.value().attr("download").is_none())
                .filter_map(|el| el.value().attr("href"))
                .filter_map(|href| resolve_link(href, base_url)),
        );
    }

    if let Ok(canonical) = Selector::parse(r#"link[rel="canonical"][href]"#) {
        links.extend(
            document
                .select(&canonical)
                .filter_map(|el| el.value().attr("href"))
                .filter_map(|href| resolve_link(href, base_url)),
        );
    }

    links
}

const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}
