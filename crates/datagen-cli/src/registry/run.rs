use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use datagen_spec::DatasetConfig;
use serde::Serialize;

use super::{RegistryError, RegistryResult};

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub runs_dir: PathBuf,
    pub spec_fingerprint: String,
    pub format: String,
    pub config: DatasetConfig,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig<'a> {
    pub run_id: &'a str,
    pub started_at: String,
    pub spec_fingerprint: &'a str,
    pub format: &'a str,
    pub dataset: &'a DatasetConfig,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub logs_path: PathBuf,
}

/// Create `<runs_dir>/<timestamp>__run_<id>` with `config.json` and an empty
/// `logs.ndjson`.
pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx
        .runs_dir
        .join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let config_path = root.join("config.json");
    let logs_path = root.join("logs.ndjson");

    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        spec_fingerprint: &ctx.spec_fingerprint,
        format: &ctx.format,
        dataset: &ctx.config,
        git: collect_git_info(),
    };

    write_json(&config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        root,
        config_path,
        logs_path,
    })
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_run_writes_config_and_log_file() {
        let runs_dir = std::env::temp_dir().join(format!("datagen_registry_{}", uuid::Uuid::new_v4()));
        let ctx = RunContext {
            run_id: "run-1".to_string(),
            started_at: Utc::now(),
            runs_dir: runs_dir.clone(),
            spec_fingerprint: "abc".to_string(),
            format: "ndjson".to_string(),
            config: DatasetConfig {
                dataset: "users".to_string(),
                ..DatasetConfig::default()
            },
        };

        let paths = start_run(&ctx).expect("start run");
        assert!(paths.root.starts_with(&runs_dir));
        assert!(paths.root.to_string_lossy().ends_with("__run_run-1"));
        assert!(paths.logs_path.exists());

        let config: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(&paths.config_path).expect("read config"),
        )
        .expect("parse config");
        assert_eq!(config["run_id"], "run-1");
        assert_eq!(config["spec_fingerprint"], "abc");
        assert_eq!(config["dataset"]["dataset"], "users");
        assert_eq!(config["dataset"]["numSplits"], 10);
    }
}
