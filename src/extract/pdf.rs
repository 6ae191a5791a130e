//! PDF branch of extraction, built on lopdf

use crate::extract::clean::clean_text;
use crate::extract::{ExtractedText, ExtractionError};
use lopdf::{Document, Object};

/// Extracts per-page text and the info-dictionary title from PDF bytes
///
/// Pages are concatenated in page order. A page whose text cannot be decoded
/// is logged and skipped.
pub fn extract_pdf(bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let document = Document::load_mem(bytes).map_err(|e| {
        if has_encrypt_entry(bytes) {
            ExtractionError::Encrypted
        } else {
            ExtractionError::Corrupt(e.to_string())
        }
    })?;

    if document.is_encrypted() {
        return Err(ExtractionError::Encrypted);
    }

    let mut pages = Vec::new();
    for number in document.get_pages().keys() {
        match document.extract_text(&[*number]) {
            Ok(text) => {
                let cleaned = clean_text(&text);
                if !cleaned.is_empty() {
                    pages.push(cleaned);
                }
            }
            Err(e) => tracing::warn!("Skipping unreadable PDF page {}: {}", number, e),
        }
    }

    if pages.is_empty() {
        return Err(ExtractionError::Empty);
    }

    Ok(ExtractedText {
        title: info_title(&document),
        text: pages.join("\n"),
    })
}

fn has_encrypt_entry(bytes: &[u8]) -> bool {
    bytes.windows(8).any(|w| w == b"/Encrypt")
}

/// `Title` from the document info dictionary, if present and non-blank
fn info_title(document: &Document) -> Option<String> {
    let info = match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    let raw = info.get(b"Title").ok()?.as_str().ok()?;
    let title = decode_text_string(raw);
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Decodes a PDF text string: UTF-16BE with a byte-order mark, else
/// single-byte (PDFDocEncoding agrees with Latin-1 for printable text)
fn decode_text_string(raw: &[u8]) -> String {
    match raw.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => raw.iter().map(|&b| b as char).collect(),
    }
}
