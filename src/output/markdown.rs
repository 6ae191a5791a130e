//! Markdown run summary
//!
//! Written to `[output] summary-path` when configured, next to the console
//! summary.

use crate::output::RunSummary;
use std::fs;
use std::path::Path;

/// Writes the run summary as markdown
///
/// # Arguments
///
/// * `summary` - The finished run summary
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown_summary(summary: &RunSummary, output_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, format_markdown_summary(summary))
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str(&format!("# UniScrape Run Summary ({})\n\n", summary.mode));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Mode**: `{}`\n", summary.mode.flag()));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    if let Some(finished) = summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(seconds) = summary.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", seconds));
    }
    md.push_str(&format!("- **Config Hash**: {}\n", summary.config_hash));
    if let Some(sink) = &summary.sink {
        md.push_str(&format!("- **Documents**: {}\n", sink));
    }
    md.push('\n');

    md.push_str("## Counts\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    let mut row = |name: &str, value: usize| md.push_str(&format!("| {} | {} |\n", name, value));
    row("Inputs", summary.inputs);
    row("Already visited", summary.already_visited);
    row("Fetched", summary.fetched);
    if let Some(discovered) = summary.discovered {
        row("Discovered", discovered);
    }
    if summary.mode.extracts() {
        row("Extracted", summary.extracted);
        row("Skipped (too short)", summary.skipped);
    }
    row("Fetch failures", summary.fetch_failed);
    row("Extraction failures", summary.extract_failed);
    row("Blocked by robots.txt", summary.robots_blocked);
    if let Some(total) = summary.documents_total {
        row("Documents in sink", total);
    }
    md.push('\n');

    md.push_str(&format!(
        "**Fetch success rate**: {:.2}% ({} of {} attempts)\n",
        summary.success_rate(),
        summary.fetched,
        summary.attempted()
    ));

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Mode;
    use tempfile::TempDir;

    fn sample() -> RunSummary {
        let mut summary = RunSummary::new(Mode::CrawlAndScrape, "deadbeef");
        summary.inputs = 1;
        summary.fetched = 2;
        summary.extracted = 2;
        summary.discovered = Some(2);
        summary.sink = Some("JSON files in output/documents".to_string());
        summary.documents_total = Some(5);
        summary.finish();
        summary
    }

    #[test]
    fn test_format_contains_counts() {
        let md = format_markdown_summary(&sample());
        assert!(md.starts_with("# UniScrape Run Summary (crawl_and_scrape)"));
        assert!(md.contains("- **Mode**: `--crawl_and_scrape`"));
        assert!(md.contains("| Extracted | 2 |"));
        assert!(md.contains("| Discovered | 2 |"));
        assert!(md.contains("| Documents in sink | 5 |"));
        assert!(md.contains("- **Config Hash**: deadbeef"));
        assert!(md.contains("100.00% (2 of 2 attempts)"));
    }

    #[test]
    fn test_crawl_only_omits_extraction_rows() {
        let summary = RunSummary::new(Mode::Crawl, "x");
        let md = format_markdown_summary(&summary);
        assert!(!md.contains("| Extracted |"));
        assert!(md.contains("| Discovered | 0 |"));
        assert!(!md.contains("| Documents in sink |"));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports/summary.md");
        write_markdown_summary(&sample(), &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("## Counts"));
    }
}
