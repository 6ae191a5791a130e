//! HTML branch of extraction
//!
//! Boilerplate elements are dropped, the content root is `article`, else
//! `main`, else `body`, and block elements become paragraph boundaries.

use crate::crawler::page_title;
use crate::extract::clean::clean_paragraph;
use crate::extract::{ExtractedText, ExtractionError};
use ego_tree::iter::Edge;
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text never reaches the document
const SKIPPED_ELEMENTS: [&str; 9] = [
    "script", "style", "nav", "aside", "footer", "form", "noscript", "iframe", "a",
];

/// Elements that start and end a paragraph
const BLOCK_ELEMENTS: [&str; 27] = [
    "address", "article", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "figcaption", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "ol", "p",
    "pre", "section", "table", "tr", "ul",
];

/// Extracts cleaned paragraphs and the page title from HTML
///
/// Bad markup never fails; [`ExtractionError::Empty`] is returned only when
/// no text survives cleaning.
pub fn extract_html(html: &str) -> Result<ExtractedText, ExtractionError> {
    let document = Html::parse_document(html);
    let paragraphs = collect_paragraphs(content_root(&document));

    if paragraphs.is_empty() {
        return Err(ExtractionError::Empty);
    }

    Ok(ExtractedText {
        title: page_title(&document),
        text: paragraphs.join("\n"),
    })
}

fn content_root(document: &Html) -> ElementRef<'_> {
    ["article", "main", "body"]
        .iter()
        .filter_map(|name| Selector::parse(name).ok())
        .find_map(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element())
}

/// Walks the subtree without recursion, so nesting depth is bounded only by memory
fn collect_paragraphs(root: ElementRef<'_>) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    // Nesting level inside a skipped element; text is dropped while non-zero
    let mut skipped = 0usize;

    for edge in root.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(el) if skipped > 0 || SKIPPED_ELEMENTS.contains(&el.name()) => {
                    skipped += 1;
                }
                Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => {
                    flush(&mut current, &mut paragraphs);
                }
                Node::Text(text) if skipped == 0 => {
                    current.push(' ');
                    current.push_str(text);
                }
                _ => {}
            },
            Edge::Close(node) => match node.value() {
                Node::Element(_) if skipped > 0 => skipped -= 1,
                Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => {
                    flush(&mut current, &mut paragraphs);
                }
                _ => {}
            },
        }
    }

    flush(&mut current, &mut paragraphs);
    paragraphs
}

fn flush(current: &mut String, paragraphs: &mut Vec<String>) {
    let cleaned = clean_paragraph(current);
    current.clear();
    if !cleaned.is_empty() {
        paragraphs.push(cleaned);
    }
}
