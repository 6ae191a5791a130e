//! SQLite document store
//!
//! The database path comes from `DOCUMENT_STORE_KEY`. Documents are upserted
//! on `source`, so re-running a scrape refreshes rows instead of adding them.

use crate::extract::{Document, DocumentMetadata, Metrics};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentSink, StorageResult, StoreOutcome};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteDocumentStore {
    conn: Connection,
    location: String,
}

impl SqliteDocumentStore {
    /// Opens or creates the database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            location: path.display().to_string(),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            location: ":memory:".to_string(),
        })
    }

    /// Loads the document stored for a source
    pub fn get(&self, source: &str) -> StorageResult<Option<Document>> {
        let row = self
            .conn
            .query_row(
                "SELECT title, extracted_at, institution, language, doc_type, metrics, content
                 FROM documents WHERE source = ?1",
                params![source],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((title, date, institution, language, kind, metrics, content)) = row else {
            return Ok(None);
        };

        let metrics: Metrics = serde_json::from_str(&metrics)?;
        Ok(Some(Document {
            metadata: DocumentMetadata {
                title,
                date,
                source: source.to_string(),
                institution,
                language,
                kind,
                metrics,
            },
            content,
        }))
    }
}

impl DocumentSink for SqliteDocumentStore {
    fn store(&mut self, document: &Document) -> StorageResult<StoreOutcome> {
        let meta = &document.metadata;
        let existed: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM documents WHERE source = ?1",
                params![meta.source],
                |row| row.get(0),
            )
            .optional()?;

        self.conn.execute(
            "INSERT INTO documents
                (source, title, institution, language, doc_type, extracted_at, metrics, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(source) DO UPDATE SET
                title = excluded.title,
                institution = excluded.institution,
                language = excluded.language,
                doc_type = excluded.doc_type,
                extracted_at = excluded.extracted_at,
                metrics = excluded.metrics,
                content = excluded.content",
            params![
                meta.source,
                meta.title,
                meta.institution,
                meta.language,
                meta.kind,
                meta.date,
                serde_json::to_string(&meta.metrics)?,
                document.content,
            ],
        )?;

        Ok(match existed {
            Some(_) => StoreOutcome::Replaced,
            None => StoreOutcome::Inserted,
        })
    }

    fn count(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn describe(&self) -> String {
        format!("SQLite document store at {}", self.location)
    }
}
