use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run directories are created.
    pub out_dir: PathBuf,
    /// Encoding of the per-split files.
    pub format: OutputFormat,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            format: OutputFormat::default(),
        }
    }
}

/// Summary of one produced split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitReport {
    pub index: u32,
    pub offset: u64,
    pub records: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

/// Report for a generation run, written as `generation_report.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub spec_fingerprint: String,
    pub splits: Vec<SplitReport>,
    pub records_total: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub throughput_records_per_sec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationReport {
    pub fn new(run_id: String, spec_fingerprint: String) -> Self {
        Self {
            run_id,
            spec_fingerprint,
            splits: Vec::new(),
            records_total: 0,
            bytes_written: 0,
            duration_ms: 0,
            throughput_records_per_sec: 0.0,
            error: None,
        }
    }

    /// Append split reports, keeping them in split order.
    pub fn record_splits(&mut self, mut splits: Vec<SplitReport>) {
        splits.sort_by_key(|split| split.index);
        self.records_total = splits.iter().map(|split| split.records).sum();
        self.bytes_written = splits.iter().map(|split| split.bytes_written).sum();
        self.splits = splits;
    }

    pub fn record_failure(&mut self, message: String) {
        self.error = Some(message);
    }
}
