//! Store handle and embedded schema.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::StoreError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS leads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lead_id TEXT UNIQUE NOT NULL,
    status TEXT NOT NULL DEFAULT 'Active',
    source_file TEXT NOT NULL,
    created_at TEXT NOT NULL,
    notes TEXT,
    fields TEXT NOT NULL            -- JSON object: canonical column -> value
);

CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status);

CREATE TABLE IF NOT EXISTS config (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    canonical_column TEXT UNIQUE NOT NULL,
    header_aliases TEXT NOT NULL,   -- JSON array of raw alias spellings
    required INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS processing_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    source_file TEXT NOT NULL,
    total_rows INTEGER NOT NULL,
    new_leads INTEGER NOT NULL,
    duplicates INTEGER NOT NULL,
    skipped INTEGER NOT NULL,
    success_rate REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS mapping_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    original_header TEXT NOT NULL,
    action TEXT NOT NULL,
    target_column TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pending_uploads (
    token TEXT PRIMARY KEY,
    source_file TEXT NOT NULL,
    headers TEXT NOT NULL,          -- JSON array
    rows TEXT NOT NULL,             -- JSON array of arrays
    created_at TEXT NOT NULL
);
"#;

/// Handle to the lead database.
///
/// The `UNIQUE` constraint on `leads.lead_id` is the authority for
/// deduplication; everything else layered on top of it is advisory.
#[derive(Debug)]
pub struct LeadStore {
    pub(crate) conn: Connection,
}

impl LeadStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened lead store");
        Self::init(conn)
    }

    /// Open a private in-memory database. Intended for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}
