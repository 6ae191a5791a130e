//! Run modes and the recipe each one follows

use crate::config::PathsConfig;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// What one invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Fetch and extract each seed; no link discovery
    Scrape,
    /// Extract local PDFs and PDF seeds
    Pdf,
    /// Discover URLs from the seeds; no extraction
    Crawl,
    /// Discover from the seeds and extract every page reached
    CrawlAndScrape,
}

/// Which Visited Record a mode reads and appends to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitedFile {
    Scraped,
    Crawled,
    Pdfs,
}

impl VisitedFile {
    pub fn path<'a>(&self, paths: &'a PathsConfig) -> &'a Path {
        match self {
            Self::Scraped => &paths.visited_file,
            Self::Crawled => &paths.crawled_file,
            Self::Pdfs => &paths.visited_pdfs_file,
        }
    }
}

/// Fixed plan for a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    pub visited: VisitedFile,
    /// Runs the crawler over the seeds
    pub discovery: bool,
    /// Extracts documents and therefore needs a document sink
    pub extraction: bool,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Scrape, Mode::Pdf, Mode::Crawl, Mode::CrawlAndScrape];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Scrape => "scrape",
            Self::Pdf => "pdf",
            Self::Crawl => "crawl",
            Self::CrawlAndScrape => "crawl_and_scrape",
        }
    }

    /// The command-line flag selecting this mode
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Scrape => "--scrape",
            Self::Pdf => "--pdf",
            Self::Crawl => "--crawl",
            Self::CrawlAndScrape => "--crawl_and_scrape",
        }
    }

    pub fn recipe(&self) -> Recipe {
        match self {
            Self::Scrape => Recipe {
                visited: VisitedFile::Scraped,
                discovery: false,
                extraction: true,
            },
            Self::Pdf => Recipe {
                visited: VisitedFile::Pdfs,
                discovery: false,
                extraction: true,
            },
            Self::Crawl => Recipe {
                visited: VisitedFile::Crawled,
                discovery: true,
                extraction: false,
            },
            Self::CrawlAndScrape => Recipe {
                visited: VisitedFile::Scraped,
                discovery: true,
                extraction: true,
            },
        }
    }

    pub fn extracts(&self) -> bool {
        self.recipe().extraction
    }

    pub fn discovers(&self) -> bool {
        self.recipe().discovery
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mode flags as given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub scrape: bool,
    pub pdf: bool,
    pub crawl: bool,
    pub crawl_and_scrape: bool,
}

impl ModeFlags {
    /// Resolves the flags to exactly one mode
    pub fn resolve(&self) -> Result<Mode, InvalidModeError> {
        let selected: Vec<Mode> = [
            (self.scrape, Mode::Scrape),
            (self.pdf, Mode::Pdf),
            (self.crawl, Mode::Crawl),
            (self.crawl_and_scrape, Mode::CrawlAndScrape),
        ]
        .into_iter()
        .filter_map(|(set, mode)| set.then_some(mode))
        .collect();

        match selected.as_slice() {
            [mode] => Ok(*mode),
            _ => Err(InvalidModeError { selected }),
        }
    }
}

/// Zero or several modes were selected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct InvalidModeError {
    pub selected: Vec<Mode>,
}

impl fmt::Display for InvalidModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let choices: Vec<&str> = Mode::ALL.iter().map(Mode::flag).collect();
        if self.selected.is_empty() {
            write!(f, "no mode selected; choose one of {}", choices.join(", "))
        } else {
            let given: Vec<&str> = self.selected.iter().map(Mode::flag).collect();
            write!(
                f,
                "modes {} cannot be combined; choose exactly one of {}",
                given.join(", "),
                choices.join(", ")
            )
        }
    }
}
