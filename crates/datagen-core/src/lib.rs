//! Core contracts shared across datagen crates.
//!
//! This crate defines the record schema types, the generated value model and
//! the schema consistency checks used by the specification and engine crates.

pub mod error;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use error::{Error, Result};
pub use schema::{FieldSchema, RecordSchema};
pub use types::FieldType;
pub use validation::{validate_record, validate_schema};
pub use value::{Record, Value};

/// Schema name used when a specification does not provide one.
pub const DEFAULT_SCHEMA_NAME: &str = "custom";
