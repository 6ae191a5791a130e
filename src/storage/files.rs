//! JSON file sink: one pretty-printed file per document

use crate::extract::Document;
use crate::storage::traits::{DocumentSink, StorageResult, StoreOutcome};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    /// Creates the sink, creating `dir` if needed
    pub fn new(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Path of the file holding the document for `source`
    pub fn path_for(&self, source: &str) -> PathBuf {
        self.dir.join(document_file_name(source))
    }
}

/// `<sha256(source)>.json`
pub fn document_file_name(source: &str) -> String {
    format!("{}.json", hex::encode(Sha256::digest(source.as_bytes())))
}

impl DocumentSink for JsonFileSink {
    fn store(&mut self, document: &Document) -> StorageResult<StoreOutcome> {
        let path = self.path_for(&document.metadata.source);
        let outcome = if path.exists() {
            StoreOutcome::Replaced
        } else {
            StoreOutcome::Inserted
        };

        let json = serde_json::to_string_pretty(document)?;
        // Write-then-rename keeps a crash from leaving a truncated document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("Wrote {}", path.display());
        Ok(outcome)
    }

    fn count(&self) -> StorageResult<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                count += 1;
            }
        }
        Ok(count)
    }

    fn describe(&self) -> String {
        format!("JSON files in {}", self.dir.display())
    }
}
