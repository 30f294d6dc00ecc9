use datagen_core::{FieldSchema, FieldType, RecordSchema};

#[test]
fn serializes_schema_deterministically() {
    let schema = RecordSchema::new(
        "user",
        vec![
            FieldSchema::new("id", FieldType::Long, false),
            FieldSchema::new("ts", FieldType::TimestampMicros, true),
        ],
    );

    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    let expected = r#"{
  "name": "user",
  "fields": [
    {
      "name": "id",
      "field_type": "long",
      "nullable": false
    },
    {
      "name": "ts",
      "field_type": "timestamp_micros",
      "nullable": true
    }
  ]
}"#;
    assert_eq!(json, expected);
}

#[test]
fn schema_round_trips_through_json() {
    let schema = RecordSchema::new(
        "purchase",
        vec![FieldSchema::new("payload", FieldType::Bytes, false)],
    );
    let json = serde_json::to_string(&schema).expect("serialize schema");
    let parsed: RecordSchema = serde_json::from_str(&json).expect("parse schema");
    assert_eq!(parsed, schema);
}
