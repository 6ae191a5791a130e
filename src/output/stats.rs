//! End-of-run counters and their console rendering

use crate::pipeline::Mode;
use chrono::{DateTime, Utc};

/// Counts reported at the end of every run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub mode: Mode,
    pub config_hash: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Seeds read from the URL source (and local PDFs, in pdf mode)
    pub inputs: usize,
    /// Inputs skipped because the Visited Record already had them
    pub already_visited: usize,
    /// Successful fetches (or local PDF reads)
    pub fetched: usize,
    /// Documents handed to the sink
    pub extracted: usize,
    /// Fetches (or local reads) that failed
    pub fetch_failed: usize,
    /// Fetched content that could not be turned into text
    pub extract_failed: usize,
    /// Documents dropped for being shorter than `min-text-length`
    pub skipped: usize,
    /// Pages reached by the crawler; `None` in modes without discovery
    pub discovered: Option<usize>,
    /// URLs robots.txt kept us away from
    pub robots_blocked: usize,
    /// Where documents went, when the mode extracts
    pub sink: Option<String>,
    /// Documents held by the sink after the run
    pub documents_total: Option<usize>,
}

impl RunSummary {
    pub fn new(mode: Mode, config_hash: &str) -> Self {
        Self {
            mode,
            config_hash: config_hash.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            inputs: 0,
            already_visited: 0,
            fetched: 0,
            extracted: 0,
            fetch_failed: 0,
            extract_failed: 0,
            skipped: 0,
            discovered: mode.discovers().then_some(0),
            robots_blocked: 0,
            sink: None,
            documents_total: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Fetch attempts made this run
    pub fn attempted(&self) -> usize {
        self.fetched + self.fetch_failed
    }

    /// Fetch and extraction failures together
    pub fn failed(&self) -> usize {
        self.fetch_failed + self.extract_failed
    }

    /// Percentage of attempted fetches that succeeded
    pub fn success_rate(&self) -> f64 {
        let attempted = self.attempted();
        if attempted == 0 {
            0.0
        } else {
            self.fetched as f64 / attempted as f64 * 100.0
        }
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== UniScrape {} summary ===\n", summary.mode);
    println!("  Inputs:          {}", summary.inputs);
    println!("  Already visited: {}", summary.already_visited);
    println!("  Fetched:         {}", summary.fetched);
    if let Some(discovered) = summary.discovered {
        println!("  Discovered:      {}", discovered);
    }
    if summary.mode.extracts() {
        println!("  Extracted:       {}", summary.extracted);
        println!("  Skipped (short): {}", summary.skipped);
    }
    println!(
        "  Failed:          {} (fetch {}, extraction {})",
        summary.failed(),
        summary.fetch_failed,
        summary.extract_failed
    );
    if summary.robots_blocked > 0 {
        println!("  robots.txt:      {} blocked", summary.robots_blocked);
    }
    if let Some(sink) = &summary.sink {
        match summary.documents_total {
            Some(total) => println!("  Documents:       {} ({} total)", sink, total),
            None => println!("  Documents:       {}", sink),
        }
    }
    if let Some(seconds) = summary.duration_seconds() {
        println!("  Duration:        {}s", seconds);
    }
}
