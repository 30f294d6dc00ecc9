use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::RecordSchema;
use crate::value::Record;

/// Validate internal consistency of a record schema.
///
/// This checks:
/// - the schema name is not empty
/// - field names are not empty
/// - field names are unique
pub fn validate_schema(schema: &RecordSchema) -> Result<()> {
    if schema.name.trim().is_empty() {
        return Err(Error::InvalidSchema("schema name is empty".to_string()));
    }

    let mut seen = BTreeSet::new();
    for (index, field) in schema.fields.iter().enumerate() {
        if field.name.trim().is_empty() {
            return Err(Error::InvalidSchema(format!(
                "field at position {index} has an empty name"
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate field name: {}.{}",
                schema.name, field.name
            )));
        }
    }

    Ok(())
}

/// Check that a record carries one value per field, with matching types and
/// nulls only in nullable fields.
pub fn validate_record(record: &Record) -> Result<()> {
    let schema = record.schema();
    if record.len() != schema.len() {
        return Err(Error::RecordMismatch(format!(
            "record has {} values but schema '{}' has {} fields",
            record.len(),
            schema.name,
            schema.len()
        )));
    }

    for (field, value) in schema.fields.iter().zip(record.values()) {
        match value.field_type() {
            None if !field.nullable => {
                return Err(Error::RecordMismatch(format!(
                    "field '{}' is not nullable but value is null",
                    field.name
                )));
            }
            Some(actual) if actual != field.field_type => {
                return Err(Error::RecordMismatch(format!(
                    "field '{}' expects {} but value is {}",
                    field.name, field.field_type, actual
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
