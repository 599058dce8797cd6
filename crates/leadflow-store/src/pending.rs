//! Suspended uploads awaiting mapping decisions.
//!
//! A pending upload persists until it is resolved or abandoned; no timeout
//! is enforced.

use chrono::{DateTime, Utc};
use rusqlite::params;

use leadflow_model::PendingUpload;

use crate::db::LeadStore;
use crate::error::StoreError;

impl LeadStore {
    /// Save the parsed rows of a run suspended in NeedsMapping.
    pub fn save_pending(&self, upload: &PendingUpload) -> Result<(), StoreError> {
        let headers = serde_json::to_string(&upload.headers)?;
        let rows = serde_json::to_string(&upload.rows)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO pending_uploads \
             (token, source_file, headers, rows, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                upload.token,
                upload.source_file,
                headers,
                rows,
                upload.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Load a suspended upload by its resume token.
    pub fn load_pending(&self, token: &str) -> Result<PendingUpload, StoreError> {
        let result = self.conn.query_row(
            "SELECT source_file, headers, rows, created_at FROM pending_uploads WHERE token = ?1",
            params![token],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        );
        let (source_file, headers, rows, created_at) = match result {
            Ok(values) => values,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StoreError::UnknownResumeToken {
                    token: token.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(PendingUpload {
            token: token.to_string(),
            source_file,
            headers: serde_json::from_str(&headers)?,
            rows: serde_json::from_str(&rows)?,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StoreError::invalid(format!("bad timestamp: {e}")))?
                .with_timezone(&Utc),
        })
    }

    /// Drop a suspended upload once resolved or abandoned.
    pub fn delete_pending(&self, token: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM pending_uploads WHERE token = ?1", params![token])?;
        Ok(())
    }
}
