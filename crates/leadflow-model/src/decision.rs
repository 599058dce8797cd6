use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A caller's intent for resolving one unknown header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MappingDecision {
    /// Append the raw header to an existing column's alias set.
    Attach { header: String, target: String },
    /// Register a brand-new canonical column whose sole initial alias is the
    /// raw header. Creating a column that already exists is a no-op.
    CreateColumn {
        header: String,
        name: String,
        #[serde(default)]
        required: bool,
    },
}

impl MappingDecision {
    /// The raw header this decision resolves.
    pub fn header(&self) -> &str {
        match self {
            MappingDecision::Attach { header, .. } => header,
            MappingDecision::CreateColumn { header, .. } => header,
        }
    }

    /// The canonical column the header ends up mapped to.
    pub fn target_column(&self) -> &str {
        match self {
            MappingDecision::Attach { target, .. } => target,
            MappingDecision::CreateColumn { name, .. } => name,
        }
    }

    pub fn action(&self) -> DecisionAction {
        match self {
            MappingDecision::Attach { .. } => DecisionAction::Attach,
            MappingDecision::CreateColumn { .. } => DecisionAction::CreateColumn,
        }
    }
}

/// Kind of mapping decision, as recorded in the decision log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Attach,
    CreateColumn,
}

impl DecisionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionAction::Attach => "attach",
            DecisionAction::CreateColumn => "create_column",
        }
    }
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable log record of one header-resolution choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingDecisionRecord {
    pub original_header: String,
    pub action: DecisionAction,
    pub target_column: String,
    pub decided_at: DateTime<Utc>,
}
