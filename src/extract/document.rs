//! The persisted document shape

use crate::extract::Metrics;
use crate::url::institution_of;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Timestamp format of `metadata.date`
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: DocumentMetadata,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    /// Extraction time, formatted with [`DATE_FORMAT`]
    pub date: String,
    /// Normalized URL, or the file path for local PDFs
    pub source: String,
    /// Publishing host without `www.`; absent for local files
    pub institution: Option<String>,
    pub language: String,
    /// `html` or `pdf`
    #[serde(rename = "type")]
    pub kind: String,
    pub metrics: Metrics,
}

/// Where a document came from
#[derive(Debug, Clone, Copy)]
pub enum DocumentSource<'a> {
    Url(&'a Url),
    File(&'a Path),
}

impl DocumentSource<'_> {
    /// The `source` field and the key sinks store the document under
    pub fn key(&self) -> String {
        match self {
            Self::Url(url) => url.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    pub fn institution(&self) -> Option<String> {
        match self {
            Self::Url(url) => institution_of(url),
            Self::File(_) => None,
        }
    }

    /// Title used when the content carries none: last path segment without
    /// its extension, else the host
    pub fn fallback_title(&self) -> String {
        match self {
            Self::Url(url) => url
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(strip_extension)
                .filter(|s| !s.is_empty())
                .or_else(|| url.host_str().map(str::to_string))
                .unwrap_or_else(|| url.to_string()),
            Self::File(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

fn strip_extension(segment: &str) -> String {
    let decoded = percent_decode(segment);
    match decoded.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => decoded,
    }
}

/// Decodes `%XX` escapes, leaving malformed escapes as they are
fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Formats an extraction timestamp
pub fn format_date(at: DateTime<Local>) -> String {
    at.format(DATE_FORMAT).to_string()
}
