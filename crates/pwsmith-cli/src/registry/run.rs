use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pwsmith_core::ScanSummary;
use pwsmith_generate::{Estimate, GenerationReport};
use serde::Serialize;
use uuid::Uuid;

use super::{RegistryError, RegistryResult};
use crate::workspace::Thresholds;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ArtifactStatus {
    Ok,
    Cancelled,
    Error,
}

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub command: String,
    pub workdir: PathBuf,
}

impl RunContext {
    pub fn new(command: impl Into<String>, workdir: PathBuf) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            command: command.into(),
            workdir,
        }
    }
}

/// Summary written to `run.json` when a run ends.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub run_id: String,
    pub command: String,
    pub status: ArtifactStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub workdir: PathBuf,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub thresholds: Thresholds,
    pub scan: Option<ScanSummary>,
    pub selection_sizes: Vec<(String, usize)>,
    pub estimate: Option<Estimate>,
    pub report: Option<GenerationReport>,
    pub error: Option<String>,
    pub artifact_version: String,
    pub cli_version: String,
}

impl RunManifest {
    pub fn new(ctx: &RunContext, status: ArtifactStatus, thresholds: Thresholds) -> Self {
        Self {
            run_id: ctx.run_id.clone(),
            command: ctx.command.clone(),
            status,
            started_at: ctx.started_at,
            finished_at: Utc::now(),
            workdir: ctx.workdir.clone(),
            input: None,
            output: None,
            thresholds,
            scan: None,
            selection_sizes: Vec::new(),
            estimate: None,
            report: None,
            error: None,
            artifact_version: pwsmith_core::ARTIFACT_VERSION.to_string(),
            cli_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub fn write_manifest(path: &Path, manifest: &RunManifest) -> RegistryResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, manifest).map_err(RegistryError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_status_serializes_uppercase() {
        let ctx = RunContext::new("run", PathBuf::from("work"));
        let manifest = RunManifest::new(&ctx, ArtifactStatus::Cancelled, Thresholds::default());
        let json = serde_json::to_value(&manifest).expect("serialize manifest");
        assert_eq!(json["status"], "CANCELLED");
        assert_eq!(json["command"], "run");
        assert_eq!(json["thresholds"]["letters"], 0.5);
    }
}
