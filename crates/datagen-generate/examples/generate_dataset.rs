use std::env;
use std::path::PathBuf;

use datagen_generate::{GenerateOptions, GenerationEngine, OutputFormat};
use datagen_spec::DatasetSpec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut spec_path: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut format = OutputFormat::Ndjson;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => out_dir = args.next().map(PathBuf::from),
            "--csv" => format = OutputFormat::Csv,
            _ => {
                if spec_path.is_none() {
                    spec_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let spec_path = spec_path.ok_or("missing spec path")?;
    let spec = DatasetSpec::from_json(&std::fs::read_to_string(&spec_path)?)?;

    let mut options = GenerateOptions {
        format,
        ..GenerateOptions::default()
    };
    if let Some(out_dir) = out_dir {
        options.out_dir = out_dir;
    }

    let engine = GenerationEngine::new(options);
    let result = engine.run(&spec)?;

    println!("run_dir={}", result.run_dir.display());
    Ok(())
}
