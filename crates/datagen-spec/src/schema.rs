use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::DatasetSpec;

/// Emit the JSON Schema for a dataset specification document.
pub fn spec_json_schema() -> RootSchema {
    schema_for!(DatasetSpec)
}
