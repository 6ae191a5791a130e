//! Storage traits and error types
//!
//! This module defines the interface for document sinks and the errors shared
//! by every file- or database-backed store in the crate.

use crate::extract::Document;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What storing a document did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// First time this source was stored
    Inserted,
    /// A document for this source already existed and was replaced
    Replaced,
}

/// Destination for extracted documents
///
/// Documents are keyed by `metadata.source`; storing the same source twice
/// replaces the earlier document instead of duplicating it.
pub trait DocumentSink {
    /// Persists one document
    fn store(&mut self, document: &Document) -> StorageResult<StoreOutcome>;

    /// Number of documents currently held
    fn count(&self) -> StorageResult<usize>;

    /// Human-readable location, for logs and the run summary
    fn describe(&self) -> String;
}
