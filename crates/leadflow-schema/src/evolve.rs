//! Schema evolution: applying a batch of caller decisions about unknown
//! headers.
//!
//! A resolution batch is all-or-nothing. Decisions are applied to a scratch
//! copy of the registry; any validation failure discards the copy, so no
//! column or alias mutation from a failed batch is ever visible. The caller
//! persists the resulting column set together with the decision log in one
//! storage transaction, then swaps the new registry in.

use chrono::Utc;

use leadflow_model::{CanonicalColumn, MappingDecision, MappingDecisionRecord};

use crate::error::SchemaError;
use crate::registry::{AliasCollision, RegisterOutcome, SchemaRegistry};

/// Result of a successfully applied resolution batch.
#[derive(Debug, Clone)]
pub struct EvolutionReport {
    /// The full column set after the batch, ready to persist.
    pub columns: Vec<CanonicalColumn>,
    /// One log record per decision, in batch order.
    pub log: Vec<MappingDecisionRecord>,
    /// Alias collisions observed while applying the batch. First writer
    /// wins; the rejected claims had no effect.
    pub collisions: Vec<AliasCollision>,
}

/// Apply a resolution batch against a scratch copy of `registry`.
///
/// `Attach` to a missing column fails the whole batch with
/// [`SchemaError::UnknownTarget`]. `CreateColumn` for an existing name is a
/// no-op for the column itself, but the initiating header is still attached
/// as an alias so the header resolves on re-reconciliation. Decisions are
/// applied in order, so a column created earlier in the batch is a valid
/// attach target later in the same batch.
pub fn apply_decisions(
    registry: &SchemaRegistry,
    decisions: &[MappingDecision],
) -> Result<EvolutionReport, SchemaError> {
    let mut scratch = registry.clone();
    let mut log = Vec::with_capacity(decisions.len());
    let mut collisions = Vec::new();
    let decided_at = Utc::now();

    for decision in decisions {
        match decision {
            MappingDecision::Attach { header, target } => {
                if let Some(collision) = scratch.register_alias(target, header)? {
                    collisions.push(collision);
                }
            }
            MappingDecision::CreateColumn {
                header,
                name,
                required,
            } => {
                match scratch.register_column(name, vec![header.clone()], *required) {
                    RegisterOutcome::Created(found) => collisions.extend(found),
                    RegisterOutcome::AlreadyExists => {
                        // Column creation is idempotent, but the header that
                        // prompted it must still resolve afterwards.
                        if let Some(collision) = scratch.register_alias(name, header)? {
                            collisions.push(collision);
                        }
                    }
                }
            }
        }
        log.push(MappingDecisionRecord {
            original_header: decision.header().to_string(),
            action: decision.action(),
            target_column: decision.target_column().to_string(),
            decided_at,
        });
    }

    Ok(EvolutionReport {
        columns: scratch.columns().to_vec(),
        log,
        collisions,
    })
}
