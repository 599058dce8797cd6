use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content-derived primary key of a lead.
///
/// Derived deterministically from a record's email or phone fields; two
/// records with the same identity refer to the same lead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadIdentity(String);

impl LeadIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LeadIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a stored lead.
///
/// The ingestion pipeline only ever creates `Active` leads; `Duplicate` is
/// an administrative flag applied outside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    Active,
    Duplicate,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Active => "Active",
            LeadStatus::Duplicate => "Duplicate",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("active") => Ok(LeadStatus::Active),
            s if s.eq_ignore_ascii_case("duplicate") => Ok(LeadStatus::Duplicate),
            other => Err(format!("Unknown lead status: {}", other)),
        }
    }
}

/// A persisted lead.
///
/// Field values live in an open map keyed by canonical column name, so
/// columns introduced at runtime need no storage migration. Created once on
/// first sighting of an identity and never overwritten by later uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub identity: LeadIdentity,
    pub status: LeadStatus,
    pub source_file: String,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
    /// Canonical column name -> value. Blank values are stored as-is.
    pub fields: BTreeMap<String, String>,
}

impl Lead {
    /// Value of a canonical field, treating absent and blank alike.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}
