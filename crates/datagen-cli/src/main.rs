mod registry;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand, ValueEnum};
use datagen_generate::output::ndjson::JsonRecord;
use datagen_generate::{
    GenerateOptions, GenerationEngine, GenerationError, GeneratorCatalog, OutputFormat,
    StreamOptions, StreamRunner,
};
use datagen_spec::{
    DatasetConfig, SpecError, SplitDescriptor, ValidationReport, load_config,
    spec_json_schema, validate_spec_document, validate_spec_with,
};
use registry::{RunContext, init_logging, start_run};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("spec error: {0}")]
    Spec(#[from] SpecError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("background task failed: {0}")]
    Task(String),
    #[error("spec validation failed with {0} error(s)")]
    Validation(usize),
}

#[derive(Parser, Debug)]
#[command(name = "datagen", version, about = "Deterministic synthetic dataset generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate every split of a dataset into a new run directory.
    Generate(GenerateArgs),
    /// Replay one split continuously as NDJSON on stdout.
    Stream(StreamArgs),
    /// Print the record schema of a dataset, or the spec JSON Schema.
    Schema(SchemaArgs),
    /// Validate a dataset spec JSON document.
    Validate(ValidateArgs),
    /// List the generator catalog.
    Generators,
}

#[derive(Args, Debug, Default)]
struct DatasetArgs {
    /// Dataset configuration file (TOML or JSON).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Dataset to build: users, purchases or custom.
    #[arg(long)]
    dataset: Option<String>,
    /// Number of splits.
    #[arg(long)]
    splits: Option<u32>,
    /// Records per split.
    #[arg(long)]
    records: Option<u64>,
    /// Global seed; omit for non-reproducible output.
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,
    /// Fields specification file for the custom dataset.
    #[arg(long, value_name = "PATH")]
    custom_config: Option<PathBuf>,
    /// Rich-data locale (en_US or pt_BR).
    #[arg(long)]
    locale: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Ndjson,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Ndjson => OutputFormat::Ndjson,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    dataset: DatasetArgs,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    out: PathBuf,
    /// Split file encoding.
    #[arg(long, value_enum, default_value_t = FormatArg::Ndjson)]
    format: FormatArg,
}

#[derive(Args, Debug)]
struct StreamArgs {
    #[command(flatten)]
    dataset: DatasetArgs,
    /// Split to replay.
    #[arg(long, default_value_t = 0)]
    split: u32,
    /// Pause between passes; defaults to the configured pauseMillisPerBatch.
    #[arg(long, value_name = "MILLIS")]
    pause_ms: Option<u64>,
    /// Stop after this many passes.
    #[arg(long)]
    max_cycles: Option<u64>,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    #[command(flatten)]
    dataset: DatasetArgs,
    /// Print the JSON Schema of the spec document instead.
    #[arg(long, default_value_t = false)]
    json_schema: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Spec JSON document.
    #[arg(value_name = "SPEC")]
    spec: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Stream(args) => {
            init_logging(None)?;
            run_stream(args).await
        }
        Command::Schema(args) => run_schema(args),
        Command::Validate(args) => run_validate(args),
        Command::Generators => {
            run_generators();
            Ok(())
        }
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        dataset,
        out,
        format,
    } = args;

    let config = resolve_config(&dataset)?;
    let spec = config.to_spec()?;
    let format = OutputFormat::from(format);

    let run_ctx = RunContext {
        run_id: Uuid::new_v4().to_string(),
        started_at: chrono::Utc::now(),
        runs_dir: out.clone(),
        spec_fingerprint: spec.fingerprint()?,
        format: format.extension().to_string(),
        config,
    };

    let run_paths = start_run(&run_ctx)?;
    init_logging(Some(&run_paths.logs_path))?;

    tracing::info!(event = "run_started", run_id = %run_ctx.run_id, dataset = %run_ctx.config.dataset);
    let timer = Instant::now();

    let engine = GenerationEngine::new(GenerateOptions {
        out_dir: out,
        format,
    });
    let run_id = run_ctx.run_id.clone();
    let run_dir = run_paths.root.clone();
    let result = tokio::task::spawn_blocking(move || engine.run_in_dir(&spec, &run_id, &run_dir))
        .await
        .map_err(|err| CliError::Task(err.to_string()))?;

    match result {
        Ok(result) => {
            tracing::info!(
                event = "run_finished",
                status = "success",
                records_total = result.report.records_total,
                duration_ms = timer.elapsed().as_millis() as u64
            );
            println!("run_dir={}", result.run_dir.display());
            Ok(())
        }
        Err(err) => {
            tracing::error!(event = "run_finished", status = "failed", error = %err);
            Err(err.into())
        }
    }
}

async fn run_stream(args: StreamArgs) -> Result<(), CliError> {
    let config = resolve_config(&args.dataset)?;
    let spec = Arc::new(config.to_spec()?);
    if args.split >= spec.num_splits() {
        return Err(CliError::InvalidConfig(format!(
            "split {} is out of range for {} split(s)",
            args.split,
            spec.num_splits()
        )));
    }

    let catalog = Arc::new(GeneratorCatalog::new());
    let report = validate_spec_with(&spec, catalog.as_ref());
    print_report(&report);
    if !report.is_ok() {
        return Err(CliError::Validation(report.errors.len()));
    }
    let options = StreamOptions {
        pause: Duration::from_millis(args.pause_ms.unwrap_or(config.pause_millis_per_batch)),
        max_cycles: args.max_cycles,
        ..StreamOptions::default()
    };
    let mut handle = StreamRunner::spawn(
        catalog,
        SplitDescriptor::new(Arc::clone(&spec), args.split),
        options,
    );

    let stdout = std::io::stdout();
    loop {
        tokio::select! {
            record = handle.records.recv() => {
                let Some(record) = record else { break };
                let mut out = stdout.lock();
                serde_json::to_writer(&mut out, &JsonRecord(&record))?;
                out.write_all(b"\n")?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!(event = "stream_interrupted");
                handle.stop();
                break;
            }
        }
    }

    let summary = handle.join().await?;
    tracing::info!(
        event = "stream_finished",
        cycles = summary.cycles,
        records = summary.records
    );
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let json = if args.json_schema {
        serde_json::to_string_pretty(&spec_json_schema())?
    } else {
        let spec = resolve_config(&args.dataset)?.to_spec()?;
        let schema = spec.schema(&GeneratorCatalog::new())?;
        serde_json::to_string_pretty(schema.as_ref())?
    };
    println!("{json}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let contents = std::fs::read_to_string(&args.spec)?;
    let spec_json: serde_json::Value = serde_json::from_str(&contents)?;

    match validate_spec_document(&spec_json) {
        Ok(spec) => {
            let report = validate_spec_with(&spec, &GeneratorCatalog::new());
            print_report(&report);
            if !report.is_ok() {
                return Err(CliError::Validation(report.errors.len()));
            }
            println!(
                "spec valid: {} splits x {} records, fingerprint {}",
                spec.num_splits(),
                spec.records_per_split(),
                spec.fingerprint()?
            );
            Ok(())
        }
        Err(report) => {
            print_report(&report);
            Err(CliError::Validation(report.errors.len()))
        }
    }
}

fn run_generators() {
    let catalog = GeneratorCatalog::new();
    for tag in catalog.tags() {
        if let Ok(factory) = catalog.resolve(tag) {
            println!("{tag}\t{}", factory.value_type());
        }
    }
}

/// Merge the optional configuration file with per-flag overrides.
fn resolve_config(args: &DatasetArgs) -> Result<DatasetConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DatasetConfig::default(),
    };

    if let Some(dataset) = &args.dataset {
        config.dataset = dataset.clone();
    }
    if let Some(splits) = args.splits {
        config.num_splits = splits;
    }
    if let Some(records) = args.records {
        config.records_per_split = records;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(locale) = &args.locale {
        config.locale = Some(locale.clone());
    }
    if let Some(path) = &args.custom_config {
        config.custom_config = Some(serde_json::Value::String(read_text(path)?));
    }

    if config.dataset.is_empty() {
        return Err(CliError::InvalidConfig(
            "dataset is required (--dataset or `dataset` in --config)".to_string(),
        ));
    }
    Ok(config)
}

fn read_text(path: &Path) -> Result<String, CliError> {
    Ok(std::fs::read_to_string(path)?)
}

fn print_report(report: &ValidationReport) {
    for issue in &report.errors {
        eprintln!("error {} {}: {}", issue.code, issue.path, issue.message);
        if let Some(hint) = &issue.hint {
            eprintln!("  hint: {hint}");
        }
    }
    for issue in &report.warnings {
        eprintln!("warning {} {}: {}", issue.code, issue.path, issue.message);
    }
}
