use serde::{Deserialize, Serialize};

/// A stable field name in the target lead schema, together with the raw
/// header spellings known to refer to it.
///
/// Columns are created once (seeded at first run or introduced through a
/// mapping decision) and never deleted. Aliases are appended over time and
/// never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalColumn {
    /// Canonical name, unique across the schema (e.g. `email`).
    pub name: String,
    /// Raw header spellings recognized for this column. The canonical name
    /// itself always resolves regardless of whether it is listed here.
    pub aliases: Vec<String>,
    /// Whether a file is expected to populate this column.
    pub required: bool,
}

impl CanonicalColumn {
    pub fn new(name: impl Into<String>, aliases: Vec<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            aliases,
            required,
        }
    }
}
