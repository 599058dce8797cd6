//! Lead persistence: atomic check-and-insert, lookups, and listings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{ErrorCode, params, params_from_iter};
use tracing::debug;

use leadflow_model::{Lead, LeadIdentity, LeadStatus};

use crate::db::LeadStore;
use crate::error::StoreError;

/// Result of attempting to persist a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A lead with the same identity already exists; nothing was written.
    DuplicateIdentity,
}

/// Filter for lead listings.
#[derive(Debug, Clone)]
pub struct LeadFilter {
    pub status: LeadStatus,
    /// Substring match against the identity and stored field values.
    pub search: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for LeadFilter {
    fn default() -> Self {
        Self {
            status: LeadStatus::Active,
            search: None,
            limit: 50,
            offset: 0,
        }
    }
}

const LEAD_COLUMNS: &str = "lead_id, status, source_file, created_at, notes, fields";

impl LeadStore {
    /// Insert a lead, relying on the identity uniqueness constraint.
    ///
    /// A constraint violation is reclassified as
    /// [`InsertOutcome::DuplicateIdentity`], never surfaced as an error:
    /// under concurrent runs the constraint, not any prior existence check,
    /// decides who was first.
    pub fn insert_lead(&self, lead: &Lead) -> Result<InsertOutcome, StoreError> {
        let fields = serde_json::to_string(&lead.fields)?;
        let result = self.conn.execute(
            "INSERT INTO leads (lead_id, status, source_file, created_at, notes, fields) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                lead.identity.as_str(),
                lead.status.as_str(),
                lead.source_file,
                lead.created_at.to_rfc3339(),
                lead.notes,
                fields,
            ],
        );
        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                debug!(identity = lead.identity.as_str(), "duplicate at insert");
                Ok(InsertOutcome::DuplicateIdentity)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a lead with this identity is already stored.
    ///
    /// Used as a pre-filter for reporting; [`Self::insert_lead`] remains the
    /// authority.
    pub fn lead_exists(&self, identity: &LeadIdentity) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM leads WHERE lead_id = ?1",
            params![identity.as_str()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Leads matching `filter`, newest first.
    pub fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, StoreError> {
        let mut sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE status = ?1");
        let mut values: Vec<String> = vec![filter.status.as_str().to_string()];
        if let Some(search) = &filter.search {
            sql.push_str(" AND (lead_id LIKE ?2 OR fields LIKE ?2)");
            values.push(format!("%{search}%"));
        }
        sql.push_str(&format!(
            " ORDER BY id DESC LIMIT {} OFFSET {}",
            filter.limit, filter.offset
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values.iter()))?;
        let mut leads = Vec::new();
        while let Some(row) = rows.next()? {
            leads.push(read_lead(row)?);
        }
        Ok(leads)
    }

    /// Number of stored leads with the given status.
    pub fn count_leads(&self, status: LeadStatus) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM leads WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// All active leads in insertion order, for export.
    pub fn export_active(&self) -> Result<Vec<Lead>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE status = 'Active' ORDER BY id"
        ))?;
        let mut rows = stmt.query([])?;
        let mut leads = Vec::new();
        while let Some(row) = rows.next()? {
            leads.push(read_lead(row)?);
        }
        Ok(leads)
    }

    /// Administrative status change. Returns false when no such lead exists.
    ///
    /// Lead field values are never mutated; this is the only write path that
    /// touches an existing row.
    pub fn update_status(
        &self,
        identity: &LeadIdentity,
        status: LeadStatus,
    ) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE leads SET status = ?1 WHERE lead_id = ?2",
            params![status.as_str(), identity.as_str()],
        )?;
        Ok(changed > 0)
    }
}

fn read_lead(row: &rusqlite::Row<'_>) -> Result<Lead, StoreError> {
    let identity: String = row.get(0)?;
    let status: String = row.get(1)?;
    let source_file: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let notes: Option<String> = row.get(4)?;
    let fields: String = row.get(5)?;

    let status: LeadStatus = status
        .parse()
        .map_err(|e: String| StoreError::invalid(e))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| StoreError::invalid(format!("bad timestamp: {e}")))?
        .with_timezone(&Utc);
    let fields: BTreeMap<String, String> = serde_json::from_str(&fields)?;

    Ok(Lead {
        identity: LeadIdentity::new(identity),
        status,
        source_file,
        created_at,
        notes,
        fields,
    })
}
