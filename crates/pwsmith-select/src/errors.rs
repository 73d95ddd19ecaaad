use thiserror::Error;

/// Errors emitted by the selection stage.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
