use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use datagen_core::RecordSchema;
use datagen_spec::{DatasetSpec, SplitDescriptor, validate_spec_with};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::catalog::GeneratorCatalog;
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationReport, SplitReport};
use crate::output::{OutputFormat, open_sink};
use crate::producer::SplitProducer;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
}

/// Produces every split of a specification into a fresh run directory.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
    catalog: Arc<GeneratorCatalog>,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self::with_catalog(options, Arc::new(GeneratorCatalog::new()))
    }

    pub fn with_catalog(options: GenerateOptions, catalog: Arc<GeneratorCatalog>) -> Self {
        Self { options, catalog }
    }

    pub fn catalog(&self) -> &GeneratorCatalog {
        &self.catalog
    }

    fn check(&self, spec: &DatasetSpec) -> Result<(), GenerationError> {
        let validation = validate_spec_with(spec, self.catalog.as_ref());
        if !validation.is_ok() {
            let messages: Vec<String> = validation
                .errors
                .iter()
                .map(|issue| format!("{} {}: {}", issue.code, issue.path, issue.message))
                .collect();
            return Err(GenerationError::InvalidSpec(messages.join("; ")));
        }
        for issue in &validation.warnings {
            warn!(code = %issue.code, path = %issue.path, message = %issue.message);
        }
        Ok(())
    }

    /// Generate into a fresh `<timestamp>__run_<uuid>` directory under the
    /// configured output directory.
    pub fn run(&self, spec: &DatasetSpec) -> Result<GenerationResult, GenerationError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{run_id}"));
        self.run_in_dir(spec, &run_id, &run_dir)
    }

    /// Generate into `run_dir`, which may already hold other run artifacts.
    pub fn run_in_dir(
        &self,
        spec: &DatasetSpec,
        run_id: &str,
        run_dir: &Path,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        self.check(spec)?;

        let spec = Arc::new(spec.clone());
        let schema = spec.schema(self.catalog.as_ref())?;
        let fingerprint = spec.fingerprint()?;
        std::fs::create_dir_all(run_dir)?;

        std::fs::write(
            run_dir.join("resolved_spec.json"),
            serde_json::to_vec_pretty(spec.as_ref())?,
        )?;
        std::fs::write(
            run_dir.join("schema.json"),
            serde_json::to_vec_pretty(schema.as_ref())?,
        )?;

        info!(
            run_id = %run_id,
            splits = spec.num_splits(),
            records_per_split = spec.records_per_split(),
            seed = spec.seed(),
            fingerprint = %fingerprint,
            "generation started"
        );

        let format = self.options.format;
        let outcome: Result<Vec<SplitReport>, GenerationError> = spec
            .splits()
            .into_par_iter()
            .map(|descriptor| {
                write_split(&self.catalog, descriptor, &schema, run_dir, format)
            })
            .collect();

        let mut report = GenerationReport::new(run_id.to_string(), fingerprint);
        let elapsed = start.elapsed();
        report.duration_ms = elapsed.as_millis() as u64;

        let report_path = run_dir.join("generation_report.json");
        let write_report = |report: &GenerationReport| -> Result<(), GenerationError> {
            std::fs::write(&report_path, serde_json::to_vec_pretty(report)?)?;
            Ok(())
        };

        match outcome {
            Ok(splits) => {
                report.record_splits(splits);
                report.throughput_records_per_sec = if elapsed.as_secs_f64() > 0.0 {
                    report.records_total as f64 / elapsed.as_secs_f64()
                } else {
                    0.0
                };
                write_report(&report)?;
                info!(
                    run_id = %run_id,
                    records_total = report.records_total,
                    bytes_written = report.bytes_written,
                    duration_ms = report.duration_ms,
                    "generation completed"
                );
                Ok(GenerationResult {
                    run_dir: run_dir.to_path_buf(),
                    report,
                })
            }
            Err(err) => {
                report.record_failure(err.to_string());
                write_report(&report)?;
                warn!(run_id = %run_id, error = %err, "generation failed");
                Err(err)
            }
        }
    }
}

/// File name of split `index`, e.g. `part-00003.ndjson`.
pub fn split_file_name(index: u32, format: OutputFormat) -> String {
    format!("part-{index:05}.{}", format.extension())
}

fn write_split(
    catalog: &GeneratorCatalog,
    descriptor: SplitDescriptor,
    schema: &RecordSchema,
    run_dir: &Path,
    format: OutputFormat,
) -> Result<SplitReport, GenerationError> {
    let split_start = Instant::now();
    let index = descriptor.split_index;
    let offset = descriptor.offset()?;

    let mut producer = SplitProducer::new(catalog, descriptor)?;
    let mut sink = open_sink(format, &run_dir.join(split_file_name(index, format)), schema)?;

    while let Some(record) = producer.next_record()? {
        sink.write(&record)?;
    }
    let bytes_written = sink.finish()?;

    let report = SplitReport {
        index,
        offset,
        records: producer.records_emitted(),
        bytes_written,
        duration_ms: split_start.elapsed().as_millis() as u64,
    };
    info!(
        split = index,
        offset,
        records = report.records,
        bytes_written,
        duration_ms = report.duration_ms,
        "split generated"
    );
    Ok(report)
}
