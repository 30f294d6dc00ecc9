use std::collections::HashSet;

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::errors::{IssueSeverity, SpecError, ValidationIssue, ValidationReport};
use crate::model::{DatasetSpec, Locale, ValueTypeResolver};
use crate::schema::spec_json_schema;

/// Validate a raw specification document against the emitted JSON Schema.
pub fn validate_spec_json(spec_json: &Value) -> Result<ValidationReport, SpecError> {
    let schema_json = serde_json::to_value(spec_json_schema())?;
    let compiled =
        JSONSchema::compile(&schema_json).map_err(|err| SpecError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(spec_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Semantic checks on a parsed specification.
pub fn validate_spec(spec: &DatasetSpec) -> ValidationReport {
    let mut report = ValidationReport::default();

    if spec.num_splits() == 0 {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "num_splits_zero",
            "/numSplits",
            "numSplits must be greater than zero",
            Some("set numSplits to a positive integer".to_string()),
        ));
    }

    if spec.records_per_split() == 0 {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "records_per_split_zero",
            "/recordsPerSplit",
            "recordsPerSplit must be greater than zero",
            Some("set recordsPerSplit to a positive integer".to_string()),
        ));
    }

    if spec.seed().is_none() {
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            "no_seed",
            "/seed",
            "no seed set; output will differ between runs",
            Some("set seed to make generation reproducible".to_string()),
        ));
    }

    if let Some(locale) = spec.locale_name() {
        if Locale::parse(locale).is_none() {
            let supported: Vec<&str> = Locale::SUPPORTED.iter().map(|l| l.as_str()).collect();
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "unsupported_locale",
                "/locale",
                format!("locale '{locale}' is not supported"),
                Some(format!("use one of: {}", supported.join(", "))),
            ));
        }
    }

    validate_fields(spec, &mut report);
    report
}

/// Semantic checks plus generator-tag resolution.
pub fn validate_spec_with(spec: &DatasetSpec, resolver: &dyn ValueTypeResolver) -> ValidationReport {
    let mut report = validate_spec(spec);
    let mut tags = ValidationReport::default();
    for (idx, field) in spec.fields().iter().enumerate() {
        if resolver.value_type(&field.generator).is_none() {
            tags.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "unknown_generator",
                format!("/fields/{idx}/type"),
                format!("unknown generator type '{}'", field.generator),
                Some("run `datagen generators` to list available types".to_string()),
            ));
        }
    }
    report.merge(tags);
    report
}

/// Structural then semantic validation of a raw document.
pub fn validate_spec_document(spec_json: &Value) -> Result<DatasetSpec, ValidationReport> {
    let structural = match validate_spec_json(spec_json) {
        Ok(report) => report,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_validation_error",
                "/",
                err.to_string(),
                None,
            ));
            return Err(report);
        }
    };

    if !structural.is_ok() {
        return Err(structural);
    }

    let mut spec: DatasetSpec = match serde_json::from_value(spec_json.clone()) {
        Ok(spec) => spec,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "invalid_spec_json",
                "/",
                err.to_string(),
                None,
            ));
            return Err(report);
        }
    };

    spec.pin_clock_defaults();

    let semantic = validate_spec(&spec);
    if semantic.is_ok() {
        Ok(spec)
    } else {
        Err(semantic)
    }
}

fn validate_fields(spec: &DatasetSpec, report: &mut ValidationReport) {
    if spec.fields().is_empty() {
        report.push_error(ValidationIssue::new(
            IssueSeverity::Error,
            "no_fields",
            "/fields",
            "specification requires at least one field",
            Some("add at least one field".to_string()),
        ));
        return;
    }

    let mut seen = HashSet::new();

    for (idx, field) in spec.fields().iter().enumerate() {
        let base_path = format!("/fields/{idx}");

        if field.name.trim().is_empty() {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "empty_field_name",
                format!("{base_path}/name"),
                "field name must not be empty",
                None,
            ));
        } else if !seen.insert(field.name.as_str()) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_field_name",
                format!("{base_path}/name"),
                format!("field '{}' is declared more than once", field.name),
                Some("field names must be unique within a specification".to_string()),
            ));
        }

        if field.null_chance > 100 {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "null_chance_out_of_range",
                format!("{base_path}/nullChance"),
                format!("nullChance {} is outside [0, 100]", field.null_chance),
                None,
            ));
        }
    }
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
