//! Text normalization shared by the HTML and PDF branches

/// Punctuation that survives cleaning; every other non-alphanumeric,
/// non-whitespace character is dropped
const KEPT_PUNCTUATION: &str = ".,;:'\"?!-";

/// Cleans one paragraph
///
/// - drops characters other than letters, digits, whitespace and `.,;:'"?!-`
/// - collapses runs of dots (and whitespace before a dot)
/// - collapses whitespace to single spaces and trims
///
/// ```
/// use uniscrape::extract::clean_paragraph;
///
/// assert_eq!(clean_paragraph("  Rekrutacja ★ trwa..... do  końca  maja "),
///            "Rekrutacja trwa. do końca maja");
/// ```
pub fn clean_paragraph(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if !(c.is_alphanumeric() || KEPT_PUNCTUATION.contains(c)) {
            continue;
        }

        if c == '.' {
            pending_space = false;
            if out.ends_with('.') {
                continue;
            }
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out
}

/// Cleans multi-line text paragraph by paragraph, dropping empty lines
pub fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(clean_paragraph)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
