use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-run counts returned to the caller after an insertion pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub source_file: String,
    pub total_rows: usize,
    pub new_leads: usize,
    pub duplicates: usize,
    /// Rows with no derivable identity; counted in neither new nor duplicate.
    pub skipped: usize,
    /// Percentage of rows that became new leads, rounded to one decimal.
    /// Zero when the file had no rows.
    pub success_rate: f64,
}

impl RunSummary {
    pub fn new(
        source_file: impl Into<String>,
        total_rows: usize,
        new_leads: usize,
        duplicates: usize,
        skipped: usize,
    ) -> Self {
        let success_rate = if total_rows == 0 {
            0.0
        } else {
            let rate = new_leads as f64 / total_rows as f64 * 100.0;
            (rate * 10.0).round() / 10.0
        };
        Self {
            source_file: source_file.into(),
            total_rows,
            new_leads,
            duplicates,
            skipped,
            success_rate,
        }
    }
}

/// Append-only log record of one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingRun {
    pub timestamp: DateTime<Utc>,
    pub source_file: String,
    pub total_rows: usize,
    pub new_leads: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub success_rate: f64,
}

impl ProcessingRun {
    pub fn from_summary(summary: &RunSummary, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            source_file: summary.source_file.clone(),
            total_rows: summary.total_rows,
            new_leads: summary.new_leads,
            duplicates: summary.duplicates,
            skipped: summary.skipped,
            success_rate: summary.success_rate,
        }
    }
}

/// What the pipeline hands back when reconciliation finds unknown headers.
///
/// The run is suspended, not failed: the parsed rows are retained under
/// `resume_token` so a later resolution call can resume without re-parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRequest {
    pub resume_token: String,
    /// Unknown headers in original file order.
    pub unknown_headers: Vec<String>,
    /// Up to a few non-blank observed values per unknown header.
    pub samples: BTreeMap<String, Vec<String>>,
    /// Canonical column names currently in the schema, for the caller to
    /// pick attachment targets from.
    pub known_columns: Vec<String>,
}

/// Result of one `ingest` or `resolve` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// All headers resolved; rows were processed and a run was logged.
    Success(RunSummary),
    /// Unknown headers require caller decisions before rows are inserted.
    NeedsMapping(MappingRequest),
}

impl IngestOutcome {
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            IngestOutcome::Success(summary) => Some(summary),
            IngestOutcome::NeedsMapping(_) => None,
        }
    }
}

/// The saved state of a run suspended in `NeedsMapping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingUpload {
    pub token: String,
    pub source_file: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub created_at: DateTime<Utc>,
}
