//! Canonical column persistence.
//!
//! The `config` table is the durable form of the schema registry. The
//! registry is the in-memory source of truth during a run; writes replace
//! the whole column set inside one transaction so concurrent readers see a
//! resolution batch fully or not at all.

use rusqlite::params;
use tracing::debug;

use leadflow_model::{CanonicalColumn, MappingDecisionRecord};

use crate::db::LeadStore;
use crate::error::StoreError;

impl LeadStore {
    /// Canonical columns in registration order. Empty on a fresh store.
    pub fn load_columns(&self) -> Result<Vec<CanonicalColumn>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT canonical_column, header_aliases, required FROM config ORDER BY id",
        )?;
        let mut rows = stmt.query([])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let aliases: String = row.get(1)?;
            let required: bool = row.get(2)?;
            let aliases: Vec<String> = serde_json::from_str(&aliases)?;
            columns.push(CanonicalColumn::new(name, aliases, required));
        }
        Ok(columns)
    }

    /// Replace the stored column set. Used for first-run seeding.
    pub fn save_columns(&mut self, columns: &[CanonicalColumn]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        write_columns(&tx, columns)?;
        tx.commit()?;
        debug!(columns = columns.len(), "saved schema config");
        Ok(())
    }

    /// Persist a resolution batch: the evolved column set plus its decision
    /// log records, in one transaction.
    pub fn apply_evolution(
        &mut self,
        columns: &[CanonicalColumn],
        log: &[MappingDecisionRecord],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        write_columns(&tx, columns)?;
        for record in log {
            tx.execute(
                "INSERT INTO mapping_history (timestamp, original_header, action, target_column) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.decided_at.to_rfc3339(),
                    record.original_header,
                    record.action.as_str(),
                    record.target_column,
                ],
            )?;
        }
        tx.commit()?;
        debug!(
            columns = columns.len(),
            decisions = log.len(),
            "applied schema evolution batch"
        );
        Ok(())
    }
}

fn write_columns(
    tx: &rusqlite::Transaction<'_>,
    columns: &[CanonicalColumn],
) -> Result<(), StoreError> {
    tx.execute("DELETE FROM config", [])?;
    for column in columns {
        let aliases = serde_json::to_string(&column.aliases)?;
        tx.execute(
            "INSERT INTO config (canonical_column, header_aliases, required) VALUES (?1, ?2, ?3)",
            params![column.name, aliases, column.required],
        )?;
    }
    Ok(())
}
