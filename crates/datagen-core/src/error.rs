use thiserror::Error;

/// Core error type shared across datagen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The record schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A record does not match the schema it claims to follow.
    #[error("record mismatch: {0}")]
    RecordMismatch(String),
}

/// Convenience alias for results returned by datagen crates.
pub type Result<T> = std::result::Result<T, Error>;
