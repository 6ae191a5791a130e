//! Storage module for persisting extracted documents
//!
//! This module handles:
//! - The `DocumentSink` interface shared by all output backends
//! - JSON files named by the SHA-256 of the document source
//! - A SQLite document store with upsert-on-source semantics

mod files;
mod schema;
mod sqlite;
mod traits;

pub use files::{document_file_name, JsonFileSink};
pub use sqlite::SqliteDocumentStore;
pub use traits::{DocumentSink, StorageError, StorageResult, StoreOutcome};

use crate::config::{Config, Secrets, SinkKind};
use crate::ScrapeError;
use std::path::Path;

/// Opens the sink selected by `[output] sink`
///
/// The database sink needs `DOCUMENT_STORE_KEY`; its absence is a fatal
/// configuration error.
pub fn open_sink(config: &Config, secrets: &Secrets) -> Result<Box<dyn DocumentSink>, ScrapeError> {
    match config.output.sink {
        SinkKind::Files => Ok(Box::new(JsonFileSink::new(&config.output.documents_dir)?)),
        SinkKind::Database => {
            let location = secrets.require_document_store()?;
            Ok(Box::new(SqliteDocumentStore::open(Path::new(location))?))
        }
    }
}
