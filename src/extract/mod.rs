//! Extraction: raw HTML or PDF bytes to cleaned text plus document metadata
//!
//! # Components
//!
//! - `html`: boilerplate removal and paragraph text for web pages
//! - `pdf`: per-page text and info title for PDFs
//! - `clean`: character filtering and whitespace normalization
//! - `metrics`: text statistics
//! - `document`: the persisted document shape
//! - `refine`: optional AI cleanup of PDF text

mod clean;
mod document;
mod html;
mod metrics;
pub(crate) mod pdf;
mod refine;

pub use clean::{clean_paragraph, clean_text};
pub use document::{format_date, Document, DocumentMetadata, DocumentSource, DATE_FORMAT};
pub use html::extract_html;
pub use metrics::Metrics;
pub use pdf::extract_pdf;
pub use refine::{chunk_text, RefineError, TextRefiner};

use crate::config::ExtractionConfig;
use crate::crawler::ContentKind;
use chrono::Local;
use thiserror::Error;

/// Per-document extraction failures; the document is skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no text could be extracted")]
    Empty,

    #[error("PDF is encrypted")]
    Encrypted,

    #[error("PDF could not be parsed: {0}")]
    Corrupt(String),

    #[error("unsupported content")]
    Unsupported,
}

/// Cleaned text and the title found inside the content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: Option<String>,
    pub text: String,
}

/// Outcome of packaging extracted text
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Document(Document),
    /// Text was shorter than `min-text-length`
    TooShort { length: usize },
}

/// Turns fetched bytes into documents
#[derive(Debug, Clone)]
pub struct Extractor {
    language: String,
    min_text_length: usize,
}

impl Extractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            language: config.language.clone(),
            min_text_length: config.min_text_length,
        }
    }

    /// Runs the branch matching `kind`
    ///
    /// Content of unknown kind is treated as HTML when it is valid UTF-8.
    /// Returns the kind that was actually extracted alongside the text.
    pub fn extract_text(
        &self,
        kind: ContentKind,
        bytes: &[u8],
    ) -> Result<(ContentKind, ExtractedText), ExtractionError> {
        match kind {
            ContentKind::Html => {
                let html = String::from_utf8_lossy(bytes);
                Ok((ContentKind::Html, extract_html(&html)?))
            }
            ContentKind::Pdf => Ok((ContentKind::Pdf, extract_pdf(bytes)?)),
            ContentKind::Unknown => {
                let text = std::str::from_utf8(bytes).map_err(|_| ExtractionError::Unsupported)?;
                Ok((ContentKind::Html, extract_html(text)?))
            }
        }
    }

    /// Builds the document, or reports that the text is too short to keep
    pub fn package(
        &self,
        source: DocumentSource<'_>,
        kind: ContentKind,
        extracted: ExtractedText,
    ) -> Extraction {
        let length = extracted.text.chars().count();
        if length < self.min_text_length {
            return Extraction::TooShort { length };
        }

        let title = extracted
            .title
            .unwrap_or_else(|| source.fallback_title());

        Extraction::Document(Document {
            metadata: DocumentMetadata {
                title,
                date: format_date(Local::now()),
                source: source.key(),
                institution: source.institution(),
                language: self.language.clone(),
                kind: kind.as_str().to_string(),
                metrics: Metrics::compute(&extracted.text),
            },
            content: extracted.text,
        })
    }

    pub fn min_text_length(&self) -> usize {
        self.min_text_length
    }
}
