use crate::UrlError;
use url::Url;

/// Query keys that identify a campaign rather than a resource
const TRACKING_KEYS: &[&str] = &["fbclid", "gclid", "mc_eid", "_ga"];

/// Canonical form of a URL, used as its Visited Record key
///
/// Two spellings of the same page must map to one key: the scheme and host
/// are lowercased (by the parser, which also drops default ports), dot
/// segments and empty segments are removed, the trailing slash goes away
/// except on the root, the fragment is dropped, and the query loses its
/// tracking keys and is sorted. Scheme and `www.` are kept.
///
/// ```
/// use uniscrape::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM//docs//page/#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/page");
/// ```
pub fn normalize_url(raw: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    let path = canonical_path(url.path());
    url.set_path(&path);
    url.set_fragment(None);

    let query = canonical_query(&url);
    if query.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(query);
    }

    Ok(url)
}

fn canonical_path(path: &str) -> String {
    let segments = path.split('/').fold(Vec::new(), |mut kept, segment| {
        match segment {
            "" | "." => {}
            ".." => {
                kept.pop();
            }
            name => kept.push(name),
        }
        kept
    });
    format!("/{}", segments.join("/"))
}

fn canonical_query(url: &Url) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_key(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    pairs.sort();
    pairs
}

fn is_tracking_key(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_KEYS.contains(&key)
}
