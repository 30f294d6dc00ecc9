use std::fs;
use std::path::{Path, PathBuf};

use datagen_generate::{
    GenerateOptions, GenerationEngine, GenerationError, GenerationReport, OutputFormat,
    split_file_name,
};
use datagen_spec::{DatasetSpec, FieldSpec, PurchasesPreset};
use serde_json::json;

fn temp_out_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("datagen_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn small_spec(seed: i64) -> DatasetSpec {
    DatasetSpec::new(
        2,
        2,
        vec![
            FieldSpec::new("id", "sequential_long", 0, None),
            FieldSpec::new("label", "random_chosen_string", 0, Some(json!({ "choices": ["x", "y", "z"] }))),
            FieldSpec::new("amount", "random_int", 25, Some(json!({ "min": 1, "max": 9 }))),
        ],
        Some("item".to_string()),
        Some(seed),
    )
}

fn read_lines(run_dir: &Path, format: OutputFormat, splits: u32) -> Vec<String> {
    let mut lines = Vec::new();
    for index in 0..splits {
        let path = run_dir.join(split_file_name(index, format));
        let contents = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("missing split file {}", path.display()));
        lines.extend(contents.lines().map(str::to_string));
    }
    lines
}

fn engine(out_dir: &Path, format: OutputFormat) -> GenerationEngine {
    GenerationEngine::new(GenerateOptions {
        out_dir: out_dir.to_path_buf(),
        format,
    })
}

#[test]
fn run_writes_split_files_and_report() {
    let out_dir = temp_out_dir("run_files");
    let result = engine(&out_dir, OutputFormat::Ndjson)
        .run(&small_spec(3))
        .expect("run generation");

    assert!(result.run_dir.starts_with(&out_dir));
    for name in ["resolved_spec.json", "schema.json", "generation_report.json"] {
        assert!(result.run_dir.join(name).exists(), "missing {name}");
    }

    let report: GenerationReport = serde_json::from_str(
        &fs::read_to_string(result.run_dir.join("generation_report.json")).expect("read report"),
    )
    .expect("parse report");
    assert_eq!(report.records_total, 4);
    assert_eq!(report.splits.len(), 2);
    assert_eq!(report.splits[0].index, 0);
    assert_eq!(report.splits[1].offset, 2);
    assert!(report.error.is_none());
    assert_eq!(report.run_id, result.report.run_id);

    let lines = read_lines(&result.run_dir, OutputFormat::Ndjson, 2);
    assert_eq!(lines.len(), 4);
    let first: serde_json::Value = serde_json::from_str(&lines[0]).expect("parse record");
    assert_eq!(first["id"], json!(0));
    let third: serde_json::Value = serde_json::from_str(&lines[2]).expect("parse record");
    assert_eq!(third["id"], json!(2));
}

#[test]
fn seeded_runs_produce_the_same_multiset() {
    let spec = small_spec(17);
    let a = engine(&temp_out_dir("multiset_a"), OutputFormat::Ndjson)
        .run(&spec)
        .expect("run A");
    let b = engine(&temp_out_dir("multiset_b"), OutputFormat::Ndjson)
        .run(&spec)
        .expect("run B");

    let mut lines_a = read_lines(&a.run_dir, OutputFormat::Ndjson, 2);
    let mut lines_b = read_lines(&b.run_dir, OutputFormat::Ndjson, 2);
    lines_a.sort();
    lines_b.sort();
    assert_eq!(lines_a, lines_b);
    assert_eq!(a.report.spec_fingerprint, b.report.spec_fingerprint);
    assert_ne!(a.report.run_id, b.report.run_id);
}

#[test]
fn csv_output_has_header_and_empty_nulls() {
    let spec = DatasetSpec::new(
        1,
        50,
        vec![
            FieldSpec::new("id", "sequential_int", 0, None),
            FieldSpec::new("maybe", "random_int", 50, None),
        ],
        None,
        Some(5),
    );
    let result = engine(&temp_out_dir("csv"), OutputFormat::Csv)
        .run(&spec)
        .expect("run generation");

    let lines = read_lines(&result.run_dir, OutputFormat::Csv, 1);
    assert_eq!(lines[0], "id,maybe");
    assert_eq!(lines.len(), 51);
    assert!(lines[1..].iter().any(|line| line.ends_with(',')));
}

#[test]
fn purchases_preset_generates_end_to_end() {
    let spec = PurchasesPreset {
        num_splits: 3,
        records_per_split: 20,
        null_chance: 0,
        seed: Some(1),
        ..PurchasesPreset::default()
    }
    .build();
    let result = engine(&temp_out_dir("purchases"), OutputFormat::Ndjson)
        .run(&spec)
        .expect("run generation");

    assert_eq!(result.report.records_total, 60);
    for line in read_lines(&result.run_dir, OutputFormat::Ndjson, 3) {
        let record: serde_json::Value = serde_json::from_str(&line).expect("parse record");
        let ts = record["ts"].as_i64().expect("ts is present");
        assert!((1_577_836_800_000_000..=1_585_699_200_000_000).contains(&ts));
    }
}

#[test]
fn invalid_spec_is_rejected_before_writing() {
    let out_dir = temp_out_dir("invalid");
    let spec = DatasetSpec::new(0, 10, vec![FieldSpec::new("n", "random_int", 0, None)], None, None);

    let err = engine(&out_dir, OutputFormat::Ndjson)
        .run(&spec)
        .err()
        .expect("invalid spec");
    assert!(matches!(err, GenerationError::InvalidSpec(_)));
    assert_eq!(fs::read_dir(&out_dir).expect("read out dir").count(), 0);
}

#[test]
fn unknown_generator_is_reported_as_invalid_spec() {
    let spec = DatasetSpec::new(
        1,
        1,
        vec![FieldSpec::new("n", "not_a_generator", 0, None)],
        None,
        Some(1),
    );
    let err = engine(&temp_out_dir("unknown_tag"), OutputFormat::Ndjson)
        .run(&spec)
        .err()
        .expect("invalid spec");
    match err {
        GenerationError::InvalidSpec(message) => assert!(message.contains("unknown_generator")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn run_in_dir_reuses_an_existing_directory() {
    let run_dir = temp_out_dir("existing");
    fs::write(run_dir.join("config.json"), "{}").expect("write config");

    let result = engine(&run_dir, OutputFormat::Ndjson)
        .run_in_dir(&small_spec(2), "fixed-run", &run_dir)
        .expect("run generation");

    assert_eq!(result.run_dir, run_dir);
    assert_eq!(result.report.run_id, "fixed-run");
    assert!(run_dir.join("config.json").exists());
    assert!(run_dir.join(split_file_name(1, OutputFormat::Ndjson)).exists());
}
