use datagen_spec::{
    DatasetSpec, FieldSpec, validate_spec, validate_spec_document, validate_spec_json,
};
use serde_json::json;

fn minimal_json() -> serde_json::Value {
    json!({
        "numSplits": 2,
        "recordsPerSplit": 2,
        "seed": 0,
        "fields": [
            { "name": "id", "type": "sequential_long", "args": { "start": 0, "step": 1 } }
        ]
    })
}

#[test]
fn minimal_spec_validates() {
    let structural = validate_spec_json(&minimal_json()).expect("validate spec json schema");
    assert!(structural.errors.is_empty(), "structural errors: {:?}", structural.errors);

    let spec = validate_spec_document(&minimal_json()).expect("spec validation should succeed");
    assert_eq!(spec.num_splits(), 2);
    assert_eq!(spec.fields()[0].null_chance, 0);
    assert_eq!(spec.schema_name(), "custom");
}

#[test]
fn structural_violation_reports_pointer() {
    let mut doc = minimal_json();
    doc["fields"][0]["nullChance"] = json!(150);

    let report = validate_spec_json(&doc).expect("validate spec json schema");
    assert!(!report.is_ok());
    assert!(
        report
            .errors
            .iter()
            .any(|issue| issue.path == "/fields/0/nullChance"),
        "errors: {:?}",
        report.errors
    );
}

#[test]
fn semantic_errors_are_collected() {
    let spec = DatasetSpec::new(
        0,
        0,
        vec![
            FieldSpec::new("a", "name", 0, None),
            FieldSpec::new("a", "name", 0, None),
            FieldSpec::new("", "email", 101, None),
        ],
        None,
        None,
    )
    .with_locale("fr_FR");

    let report = validate_spec(&spec);
    for code in [
        "num_splits_zero",
        "records_per_split_zero",
        "duplicate_field_name",
        "empty_field_name",
        "null_chance_out_of_range",
        "unsupported_locale",
    ] {
        assert!(report.has_error(code), "missing {code}: {:?}", report.errors);
    }
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code, "no_seed");
}

#[test]
fn empty_field_list_is_rejected() {
    let spec = DatasetSpec::new(1, 1, Vec::new(), None, Some(1));
    let report = validate_spec(&spec);
    assert!(report.has_error("no_fields"));
    assert!(report.warnings.is_empty());
}

#[test]
fn spec_round_trips_through_json() {
    let spec = DatasetSpec::from_json(&minimal_json().to_string()).expect("parse spec");
    let text = spec.to_json_pretty().expect("serialize spec");
    let back = DatasetSpec::from_json(&text).expect("parse again");
    assert_eq!(spec, back);
    assert_eq!(spec.fingerprint().unwrap(), back.fingerprint().unwrap());
}

#[test]
fn validated_document_pins_open_timestamp_window() {
    let document = json!({
        "numSplits": 1,
        "recordsPerSplit": 1,
        "seed": 3,
        "fields": [
            { "name": "ts", "type": "timestamp", "args": { "from": 1000 } }
        ]
    });

    let spec = validate_spec_document(&document).expect("valid spec");
    let args = spec.fields()[0].args.clone().expect("args");
    assert_eq!(args["from"], json!(1000));
    assert!(args["to"].as_i64().is_some_and(|to| to > 1000));
}
