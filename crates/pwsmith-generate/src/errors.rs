use thiserror::Error;

/// Errors emitted by forecasting and generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error("core error: {0}")]
    Core(#[from] pwsmith_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
