use thiserror::Error;

use crate::classify::InvalidRecord;

/// Core error type shared across pwsmith crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A corpus record could not be classified.
    #[error("invalid record at line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: InvalidRecord,
    },
    /// A tag string is not a valid (condensed) pattern.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results returned by pwsmith crates.
pub type Result<T> = std::result::Result<T, Error>;
