//! Database schema for the document store

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per extracted document, keyed by its source
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    institution TEXT,
    language TEXT NOT NULL,
    doc_type TEXT NOT NULL,
    extracted_at TEXT NOT NULL,
    metrics TEXT NOT NULL,
    content TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_institution ON documents(institution);
CREATE INDEX IF NOT EXISTS idx_documents_type ON documents(doc_type);
"#;

/// Creates the tables if they are missing
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
