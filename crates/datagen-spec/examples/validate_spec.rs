use std::env;
use std::path::{Path, PathBuf};

use datagen_spec::{ValidationReport, validate_spec_document};
use serde_json::Value;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let spec_path: PathBuf = args.next().map(PathBuf::from).ok_or("missing spec path")?;
    if args.next().is_some() {
        return Err("unexpected argument".into());
    }

    let spec_json = load_json(&spec_path)?;
    let spec = match validate_spec_document(&spec_json) {
        Ok(spec) => spec,
        Err(report) => {
            eprintln!("spec validation failed");
            print_report(&report);
            std::process::exit(1);
        }
    };

    println!(
        "spec validated: {} splits x {} records, fingerprint {}",
        spec.num_splits(),
        spec.records_per_split(),
        spec.fingerprint()?
    );
    Ok(())
}

fn load_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let json = serde_json::from_str(&contents)?;
    Ok(json)
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
