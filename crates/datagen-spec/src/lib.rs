//! Dataset specification contracts for datagen.
//!
//! A [`DatasetSpec`] declares the shape of a synthetic dataset: how many
//! splits, how many records per split, the optional seed and the ordered
//! field list. This crate also owns the canned presets, the dataset
//! configuration layer, validation and JSON Schema emission.

pub mod config;
pub mod errors;
pub mod model;
pub mod presets;
pub mod schema;
pub mod validate;

pub use config::{DatasetConfig, DatasetSelector, load_config};
pub use errors::{IssueSeverity, Result, SpecError, ValidationIssue, ValidationReport};
pub use model::{
    DatasetSpec, FieldSpec, FieldsSpecification, Locale, SplitDescriptor, ValueTypeResolver,
};
pub use presets::{PurchasesPreset, UsersPreset};
pub use schema::spec_json_schema;
pub use validate::{validate_spec, validate_spec_document, validate_spec_json, validate_spec_with};
