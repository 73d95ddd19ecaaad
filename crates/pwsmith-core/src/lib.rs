//! Core contracts for pwsmith.
//!
//! This crate defines the symbol classes, pattern types and the record
//! classifier shared by the selection and generation crates and the CLI.

pub mod classify;
pub mod corpus;
pub mod error;
pub mod pattern;
pub mod streams;
pub mod symbol;

pub use classify::{Classification, InvalidRecord, classify};
pub use corpus::{ScanSummary, scan_corpus};
pub use error::{Error, Result};
pub use pattern::{ClassPresence, CondensedPattern, Pattern};
pub use streams::{Stream, StreamSink};
pub use symbol::SymbolClass;

/// Current contract version for persisted artifacts.
pub const ARTIFACT_VERSION: &str = "0.1";
