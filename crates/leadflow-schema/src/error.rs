use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A mapping decision named a canonical column that does not exist.
    #[error("unknown mapping target column: {target}")]
    UnknownTarget { target: String },
}
