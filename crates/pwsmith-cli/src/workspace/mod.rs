mod approval;
mod artifacts;
mod atomic;
mod paths;
mod settings;

pub use approval::{ConsoleApprover, WriteIntent};
pub use artifacts::{ArtifactStore, StreamFiles};
pub use paths::WorkspacePaths;
pub use settings::{
    Settings, ThresholdOverrides, Thresholds, load_or_create_settings, load_settings,
};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("toml encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("core error: {0}")]
    Core(#[from] pwsmith_core::Error),
    #[error("selection error: {0}")]
    Select(#[from] pwsmith_select::SelectError),
    #[error("missing artifact: {}", .0.display())]
    MissingArtifact(PathBuf),
    #[error("invalid workspace state: {0}")]
    Invalid(String),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
