use std::sync::Arc;

use datagen_core::{FieldType, Value, validate_record};
use datagen_generate::{
    GenerationError, GeneratorCatalog, ProducerState, SplitProducer, produce_split,
};
use datagen_spec::{DatasetSpec, FieldSpec, SplitDescriptor, UsersPreset};
use serde_json::json;

fn descriptor(spec: DatasetSpec, index: u32) -> SplitDescriptor {
    SplitDescriptor::new(Arc::new(spec), index)
}

#[test]
fn sequential_values_follow_offset_and_step() {
    let fields = vec![FieldSpec::new(
        "id",
        "sequential_int",
        0,
        Some(json!({ "start": 0, "step": 10 })),
    )];
    let spec = DatasetSpec::new(2, 5, fields, None, Some(1));
    let catalog = GeneratorCatalog::new();

    let first = produce_split(&catalog, descriptor(spec.clone(), 0)).expect("split 0");
    let ids: Vec<Value> = first.iter().map(|r| r.values()[0].clone()).collect();
    assert_eq!(
        ids,
        vec![
            Value::Int(0),
            Value::Int(10),
            Value::Int(20),
            Value::Int(30),
            Value::Int(40)
        ]
    );

    let second = produce_split(&catalog, descriptor(spec, 1)).expect("split 1");
    assert_eq!(second[0].values()[0], Value::Int(50));
}

#[test]
fn null_rate_tracks_null_chance() {
    let fields = vec![FieldSpec::new("n", "random_long", 30, None)];
    let spec = DatasetSpec::new(1, 100_000, fields, None, Some(11));
    let catalog = GeneratorCatalog::new();

    let records = produce_split(&catalog, descriptor(spec, 0)).expect("produce");
    let nulls = records.iter().filter(|r| r.values()[0].is_null()).count();
    let rate = nulls as f64 / records.len() as f64;
    assert!((0.29..0.31).contains(&rate), "null rate {rate}");
}

#[test]
fn non_nullable_fields_never_emit_null() {
    let fields = vec![
        FieldSpec::new("a", "random_int", 0, None),
        FieldSpec::new("b", "email", 0, None),
    ];
    let spec = DatasetSpec::new(1, 2_000, fields, None, Some(2));
    let records = produce_split(&GeneratorCatalog::new(), descriptor(spec, 0)).expect("produce");
    assert!(records.iter().all(|r| r.values().iter().all(|v| !v.is_null())));
}

#[test]
fn records_conform_to_the_derived_schema() {
    let spec = UsersPreset {
        num_splits: 1,
        records_per_split: 200,
        seed: Some(42),
        ..UsersPreset::default()
    }
    .build();
    let catalog = GeneratorCatalog::new();
    let schema = spec.schema(&catalog).expect("schema");

    assert_eq!(schema.name, "user");
    let types: Vec<FieldType> = schema.fields.iter().map(|f| f.field_type).collect();
    assert_eq!(
        types,
        vec![
            FieldType::Long,
            FieldType::String,
            FieldType::String,
            FieldType::String,
            FieldType::String,
            FieldType::String,
            FieldType::Int,
            FieldType::String,
            FieldType::Double,
            FieldType::Bytes,
        ]
    );
    for (field, field_spec) in schema.fields.iter().zip(spec.fields()) {
        assert_eq!(field.nullable, field_spec.null_chance > 0, "{}", field.name);
    }

    let records = produce_split(&catalog, descriptor(spec, 0)).expect("produce");
    for record in &records {
        validate_record(record).expect("record matches schema");
        assert_eq!(record.get("payload").and_then(Value::as_bytes).map(<[u8]>::len), Some(1024));
    }
}

#[test]
fn producer_reports_progress_and_state() {
    let fields = vec![FieldSpec::new("n", "random_int", 0, None)];
    let spec = DatasetSpec::new(1, 4, fields, None, Some(8));
    let mut producer =
        SplitProducer::new(&GeneratorCatalog::new(), descriptor(spec, 0)).expect("producer");

    assert_eq!(producer.state(), ProducerState::Initialized);
    assert_eq!(producer.progress(), 0.0);

    producer.next_record().expect("record").expect("some");
    assert_eq!(producer.state(), ProducerState::Producing);
    assert_eq!(producer.progress(), 0.25);

    let rest: Vec<_> = producer.by_ref().collect::<Result<_, _>>().expect("rest");
    assert_eq!(rest.len(), 3);
    assert_eq!(producer.state(), ProducerState::Exhausted);
    assert_eq!(producer.records_emitted(), 4);
    assert_eq!(producer.progress(), 1.0);
    assert!(producer.next_record().expect("no error").is_none());
}

#[test]
fn unknown_generator_fails_at_construction() {
    let fields = vec![
        FieldSpec::new("ok", "random_int", 0, None),
        FieldSpec::new("bad", "no_such_generator", 0, None),
    ];
    let spec = DatasetSpec::new(1, 1, fields, None, Some(1));

    let err = SplitProducer::new(&GeneratorCatalog::new(), descriptor(spec, 0))
        .err()
        .expect("construction error");
    assert!(matches!(err, GenerationError::Spec(_) | GenerationError::GeneratorConstruction { .. }));
}

#[test]
fn invalid_arguments_name_the_field() {
    let fields = vec![FieldSpec::new(
        "age",
        "random_int",
        0,
        Some(json!({ "min": 10, "max": 1 })),
    )];
    let spec = DatasetSpec::new(1, 1, fields, None, Some(1));

    let err = SplitProducer::new(&GeneratorCatalog::new(), descriptor(spec, 0))
        .err()
        .expect("construction error");
    match err {
        GenerationError::GeneratorConstruction { field, source } => {
            assert_eq!(field, "age");
            assert!(matches!(*source, GenerationError::InvalidGeneratorConfig { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unsupported_variant_fails_before_any_record() {
    let fields = vec![FieldSpec::new("who", "name", 0, Some(json!({ "type": "nickname" })))];
    let spec = DatasetSpec::new(1, 1, fields, None, Some(1));

    let err = SplitProducer::new(&GeneratorCatalog::new(), descriptor(spec, 0))
        .err()
        .expect("construction error");
    match err {
        GenerationError::GeneratorConstruction { source, .. } => {
            assert!(matches!(*source, GenerationError::UnsupportedVariant { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}
