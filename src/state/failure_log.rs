use crate::storage::StorageResult;
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

const HEADER: &str = "timestamp\turl\treason\tkind";

/// Append-only TSV of failed fetches and extractions
///
/// Failures are kept out of the Visited Record so the next run retries them;
/// this log is what an operator reads to see which URLs keep failing.
#[derive(Debug)]
pub struct FailureLog {
    file: File,
    recorded: usize,
}

impl FailureLog {
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", HEADER)?;
        }

        Ok(Self { file, recorded: 0 })
    }

    /// Appends one failure row
    pub fn record(&mut self, url: &str, reason: &str, transient: bool) -> StorageResult<()> {
        let kind = if transient { "transient" } else { "permanent" };
        writeln!(
            self.file,
            "{}\t{}\t{}\t{}",
            Utc::now().to_rfc3339(),
            sanitize(url),
            sanitize(reason),
            kind
        )?;
        self.file.flush()?;
        self.recorded += 1;
        Ok(())
    }

    /// Number of rows recorded by this run
    pub fn recorded(&self) -> usize {
        self.recorded
    }
}

/// Keeps a field on one TSV cell
fn sanitize(field: &str) -> String {
    field
        .chars()
        .map(|c| if c == '\t' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
