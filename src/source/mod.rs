//! URL Source: seed lists and local PDF inputs
//!
//! Seed files are delimited text with one URL per row. Only the first column
//! is read, so the visited and discovered files written by this crate can be
//! fed back in as seeds.

use crate::state::open_list_for_append;
use crate::url::normalize_url;
use crate::{Result, ScrapeError};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

const HEADER: &str = "url";

/// A PDF to extract, either on disk or behind a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfReference {
    Local(PathBuf),
    Remote(Url),
}

impl PdfReference {
    /// The Visited Record key: file name for local PDFs, normalized URL otherwise
    pub fn key(&self) -> String {
        match self {
            Self::Local(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Remote(url) => url.to_string(),
        }
    }
}

impl std::fmt::Display for PdfReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Reads the ordered, deduplicated seed list
///
/// # Arguments
///
/// * `path` - Seed file; comma- or tab-delimited, first column is the URL
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - Normalized seeds in file order
/// * `Err(ScrapeError::SourceUnavailable)` - The file is missing or unreadable
pub fn read_seed_file(path: &Path) -> Result<Vec<Url>> {
    let content = fs::read_to_string(path).map_err(|e| ScrapeError::SourceUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(parse_seed_list(&content))
}

/// Parses seed rows, skipping headers, comments and malformed lines
pub fn parse_seed_list(content: &str) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let Some(entry) = first_column(line) else {
            continue;
        };

        if entry.eq_ignore_ascii_case(HEADER) {
            continue;
        }

        match normalize_url(entry) {
            Ok(url) => {
                if seen.insert(url.to_string()) {
                    seeds.push(url);
                }
            }
            Err(e) => {
                tracing::warn!("Skipping seed line {}: {:?} ({})", index + 1, entry, e);
            }
        }
    }

    seeds
}

fn first_column(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let column = if trimmed.contains('\t') {
        trimmed.split('\t').next()
    } else {
        trimmed.split(',').next()
    };

    column
        .map(|c| c.trim().trim_matches('"'))
        .filter(|c| !c.is_empty())
}

/// Lists `*.pdf` files in a directory, sorted by path
///
/// A missing directory yields an empty list.
pub fn list_local_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        tracing::debug!("PDF directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if path.is_file() && is_pdf {
            pdfs.push(path);
        }
    }

    pdfs.sort();
    Ok(pdfs)
}

/// Appends URLs to a list file in seed-file format
///
/// URLs already present in the file are skipped. Returns how many were written.
pub fn append_url_list<'a, I>(path: &Path, urls: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Url>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut existing: HashSet<String> = match fs::read_to_string(path) {
        Ok(content) => parse_seed_list(&content)
            .into_iter()
            .map(|u| u.to_string())
            .collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
        Err(e) => return Err(e.into()),
    };

    let mut file = open_list_for_append(path)?;
    let mut written = 0;
    for url in urls {
        if existing.insert(url.to_string()) {
            writeln!(file, "{}", url)?;
            written += 1;
        }
    }
    file.flush()?;

    Ok(written)
}
