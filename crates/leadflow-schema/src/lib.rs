#![deny(unsafe_code)]

pub mod error;
pub mod evolve;
pub mod normalize;
pub mod reconcile;
pub mod registry;
pub mod seed;

pub use error::SchemaError;
pub use evolve::{EvolutionReport, apply_decisions};
pub use normalize::normalize_header;
pub use reconcile::{Reconciliation, reconcile};
pub use registry::{AliasCollision, RegisterOutcome, Schema, SchemaRegistry};
pub use seed::default_columns;
