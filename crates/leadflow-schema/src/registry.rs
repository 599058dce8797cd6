//! Schema registry: the ordered set of canonical columns and the derived
//! alias lookup table.
//!
//! The registry is an explicitly owned, injectable value. Durability is the
//! caller's concern: the engine loads the column set from the store at
//! startup and persists mutations back through it, so the lookup table here
//! is always a pure function of the current column set.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;
use tracing::debug;

use leadflow_model::CanonicalColumn;

use crate::error::SchemaError;
use crate::normalize::normalize_header;

/// A normalized alias claimed by two different canonical columns.
///
/// First writer wins: `kept` retains the key and `rejected` has no effect.
/// Collisions are surfaced to the caller rather than silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasCollision {
    /// The raw alias spelling that collided.
    pub alias: String,
    /// Its normalized key.
    pub normalized: String,
    /// The canonical column that already owns the key.
    pub kept: String,
    /// The canonical column whose claim was dropped.
    pub rejected: String,
}

/// The current column set plus the derived `normalized alias -> canonical
/// name` lookup table.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<CanonicalColumn>,
    alias_map: BTreeMap<String, String>,
}

impl Schema {
    /// Canonical columns in registration order.
    pub fn columns(&self) -> &[CanonicalColumn] {
        &self.columns
    }

    /// Canonical column names in registration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Resolve a raw header to its canonical column name, if any.
    pub fn resolve(&self, raw_header: &str) -> Option<&str> {
        let key = normalize_header(raw_header);
        if key.is_empty() {
            return None;
        }
        self.alias_map.get(&key).map(String::as_str)
    }

    /// Columns flagged as required.
    pub fn required_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.required)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Outcome of registering a canonical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The column was added; any alias collisions found while rebuilding the
    /// lookup table are included.
    Created(Vec<AliasCollision>),
    /// A column with this name already exists; nothing changed.
    AlreadyExists,
}

/// Owner of the canonical column set.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schema: Schema,
}

impl SchemaRegistry {
    /// Build a registry from a column set, reporting alias collisions.
    pub fn from_columns(columns: Vec<CanonicalColumn>) -> (Self, Vec<AliasCollision>) {
        let (schema, collisions) = build_schema(columns);
        (Self { schema }, collisions)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[CanonicalColumn] {
        self.schema.columns()
    }

    /// Append a raw alias to an existing column.
    ///
    /// Returns `Ok(Some(collision))` when the alias normalizes to a key
    /// already owned by a different column; the earlier owner keeps the key
    /// and the alias is not appended.
    pub fn register_alias(
        &mut self,
        target: &str,
        raw_alias: &str,
    ) -> Result<Option<AliasCollision>, SchemaError> {
        let Some(position) = self.schema.columns.iter().position(|c| c.name == target) else {
            return Err(SchemaError::UnknownTarget {
                target: target.to_string(),
            });
        };

        let normalized = normalize_header(raw_alias);
        if let Some(owner) = self.schema.alias_map.get(&normalized)
            && owner.as_str() != target
        {
            return Ok(Some(AliasCollision {
                alias: raw_alias.to_string(),
                normalized,
                kept: owner.clone(),
                rejected: target.to_string(),
            }));
        }

        let column = &mut self.schema.columns[position];
        if !column.aliases.iter().any(|a| a == raw_alias) {
            column.aliases.push(raw_alias.to_string());
        }
        self.rebuild();
        Ok(None)
    }

    /// Register a brand-new canonical column.
    ///
    /// A column whose name already exists is left untouched and reported as
    /// [`RegisterOutcome::AlreadyExists`].
    pub fn register_column(
        &mut self,
        name: &str,
        initial_aliases: Vec<String>,
        required: bool,
    ) -> RegisterOutcome {
        if self.schema.columns.iter().any(|c| c.name == name) {
            debug!(column = name, "column already registered");
            return RegisterOutcome::AlreadyExists;
        }
        self.schema
            .columns
            .push(CanonicalColumn::new(name, initial_aliases, required));
        let collisions = self.rebuild();
        RegisterOutcome::Created(collisions)
    }

    fn rebuild(&mut self) -> Vec<AliasCollision> {
        let (schema, collisions) = build_schema(std::mem::take(&mut self.schema.columns));
        self.schema = schema;
        collisions
    }
}

/// Derive the lookup table from a column set.
///
/// Every column's own name is inserted ahead of its aliases, so a header
/// literally matching the canonical name always resolves. On a key claimed
/// by two different columns, the first-registered column wins.
fn build_schema(columns: Vec<CanonicalColumn>) -> (Schema, Vec<AliasCollision>) {
    let mut alias_map: BTreeMap<String, String> = BTreeMap::new();
    let mut collisions = Vec::new();

    for column in &columns {
        for alias in std::iter::once(column.name.as_str()).chain(column.aliases.iter().map(String::as_str))
        {
            let normalized = normalize_header(alias);
            if normalized.is_empty() {
                continue;
            }
            match alias_map.entry(normalized.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(column.name.clone());
                }
                Entry::Occupied(entry) => {
                    if entry.get() != &column.name {
                        collisions.push(AliasCollision {
                            alias: alias.to_string(),
                            normalized,
                            kept: entry.get().clone(),
                            rejected: column.name.clone(),
                        });
                    }
                }
            }
        }
    }

    (Schema { columns, alias_map }, collisions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(columns: Vec<CanonicalColumn>) -> SchemaRegistry {
        SchemaRegistry::from_columns(columns).0
    }

    #[test]
    fn canonical_name_always_resolves() {
        let reg = registry(vec![CanonicalColumn::new("email", vec![], true)]);
        assert_eq!(reg.schema().resolve("email"), Some("email"));
        assert_eq!(reg.schema().resolve("E-MAIL"), None);
    }

    #[test]
    fn first_registered_column_wins_collisions() {
        let columns = vec![
            CanonicalColumn::new("email", vec!["contact".to_string()], true),
            CanonicalColumn::new("company_phone", vec!["Contact".to_string()], false),
        ];
        let (reg, collisions) = SchemaRegistry::from_columns(columns);
        assert_eq!(reg.schema().resolve("contact"), Some("email"));
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].kept, "email");
        assert_eq!(collisions[0].rejected, "company_phone");
    }

    #[test]
    fn register_alias_unknown_target_errors() {
        let mut reg = registry(vec![CanonicalColumn::new("email", vec![], true)]);
        let err = reg.register_alias("zip_code", "Zip").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTarget { .. }));
    }

    #[test]
    fn register_alias_collision_is_surfaced_not_applied() {
        let mut reg = registry(vec![
            CanonicalColumn::new("email", vec![], true),
            CanonicalColumn::new("website", vec![], false),
        ]);
        let collision = reg
            .register_alias("website", "E-Mail")
            .expect("target exists")
            .expect("collides with email");
        assert_eq!(collision.kept, "email");
        assert_eq!(reg.schema().resolve("E-Mail"), Some("email"));
        assert!(reg.columns()[1].aliases.is_empty());
    }

    #[test]
    fn register_column_is_idempotent() {
        let mut reg = registry(vec![CanonicalColumn::new("email", vec![], true)]);
        assert!(matches!(
            reg.register_column("zip_code", vec!["Zip".to_string()], false),
            RegisterOutcome::Created(_)
        ));
        assert_eq!(
            reg.register_column("zip_code", vec![], false),
            RegisterOutcome::AlreadyExists
        );
        assert_eq!(reg.schema().resolve("zip"), Some("zip_code"));
    }
}
