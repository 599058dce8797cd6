//! Append-only processing and mapping logs, plus aggregate counters.

use chrono::{DateTime, Utc};
use rusqlite::params;

use leadflow_model::{DecisionAction, LeadStatus, MappingDecisionRecord, ProcessingRun};

use crate::db::LeadStore;
use crate::error::StoreError;

/// Dashboard-style counters over the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    pub active_leads: usize,
    pub duplicate_leads: usize,
    pub runs_today: usize,
    /// Mean success rate over the last seven days of runs; zero when there
    /// were none.
    pub avg_success_rate_7d: f64,
}

impl LeadStore {
    /// Append one processing-run record. Records are never mutated.
    pub fn append_run(&self, run: &ProcessingRun) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO processing_log \
             (timestamp, source_file, total_rows, new_leads, duplicates, skipped, success_rate) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run.timestamp.to_rfc3339(),
                run.source_file,
                run.total_rows as i64,
                run.new_leads as i64,
                run.duplicates as i64,
                run.skipped as i64,
                run.success_rate,
            ],
        )?;
        Ok(())
    }

    /// Most recent processing runs, newest first.
    pub fn recent_runs(&self, limit: usize) -> Result<Vec<ProcessingRun>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, source_file, total_rows, new_leads, duplicates, skipped, \
             success_rate FROM processing_log ORDER BY id DESC LIMIT ?1",
        )?;
        let mut rows = stmt.query(params![limit as i64])?;
        let mut runs = Vec::new();
        while let Some(row) = rows.next()? {
            let timestamp: String = row.get(0)?;
            runs.push(ProcessingRun {
                timestamp: parse_timestamp(&timestamp)?,
                source_file: row.get(1)?,
                total_rows: row.get::<_, i64>(2)? as usize,
                new_leads: row.get::<_, i64>(3)? as usize,
                duplicates: row.get::<_, i64>(4)? as usize,
                skipped: row.get::<_, i64>(5)? as usize,
                success_rate: row.get(6)?,
            });
        }
        Ok(runs)
    }

    /// Most recent mapping decisions, newest first.
    pub fn decision_history(&self, limit: usize) -> Result<Vec<MappingDecisionRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, original_header, action, target_column FROM mapping_history \
             ORDER BY id DESC LIMIT ?1",
        )?;
        let mut rows = stmt.query(params![limit as i64])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let timestamp: String = row.get(0)?;
            let action: String = row.get(2)?;
            records.push(MappingDecisionRecord {
                decided_at: parse_timestamp(&timestamp)?,
                original_header: row.get(1)?,
                action: parse_action(&action)?,
                target_column: row.get(3)?,
            });
        }
        Ok(records)
    }

    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        let runs_today: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM processing_log WHERE date(timestamp) = date('now')",
            [],
            |row| row.get(0),
        )?;
        let avg: Option<f64> = self.conn.query_row(
            "SELECT AVG(success_rate) FROM processing_log \
             WHERE julianday(timestamp) >= julianday('now', '-7 days')",
            [],
            |row| row.get(0),
        )?;
        Ok(StoreStats {
            active_leads: self.count_leads(LeadStatus::Active)?,
            duplicate_leads: self.count_leads(LeadStatus::Duplicate)?,
            runs_today: runs_today as usize,
            avg_success_rate_7d: avg.unwrap_or(0.0),
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::invalid(format!("bad timestamp: {e}")))
}

fn parse_action(raw: &str) -> Result<DecisionAction, StoreError> {
    match raw {
        "attach" => Ok(DecisionAction::Attach),
        "create_column" => Ok(DecisionAction::CreateColumn),
        other => Err(StoreError::invalid(format!(
            "unknown mapping action: {other}"
        ))),
    }
}
