//! Header reconciliation: mapping a file's raw headers onto the canonical
//! schema.

use tracing::debug;

use crate::registry::Schema;

/// Result of reconciling one file's headers against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// `(raw header, canonical column)` pairs in original file order.
    ///
    /// Two distinct raw headers may map to the same canonical column; both
    /// are kept, and materialization is last-one-wins in this order.
    pub header_map: Vec<(String, String)>,
    /// Headers with no canonical match, preserving original file order.
    pub unknown_headers: Vec<String>,
}

impl Reconciliation {
    pub fn is_fully_resolved(&self) -> bool {
        self.unknown_headers.is_empty()
    }

    /// Canonical column for a raw header, if resolved.
    pub fn canonical_for(&self, raw_header: &str) -> Option<&str> {
        self.header_map
            .iter()
            .find(|(raw, _)| raw == raw_header)
            .map(|(_, canonical)| canonical.as_str())
    }
}

/// Match each raw header against the schema's alias table.
///
/// Headers are matched independently; there is no cross-header
/// disambiguation.
pub fn reconcile(raw_headers: &[String], schema: &Schema) -> Reconciliation {
    let mut header_map = Vec::new();
    let mut unknown_headers = Vec::new();

    for raw in raw_headers {
        match schema.resolve(raw) {
            Some(canonical) => header_map.push((raw.clone(), canonical.to_string())),
            None => unknown_headers.push(raw.clone()),
        }
    }

    debug!(
        resolved = header_map.len(),
        unknown = unknown_headers.len(),
        "reconciled headers"
    );

    Reconciliation {
        header_map,
        unknown_headers,
    }
}
