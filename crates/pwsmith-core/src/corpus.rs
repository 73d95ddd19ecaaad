use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::error::{Error, Result};
use crate::streams::StreamSink;

/// Counters for a single classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub lines: u64,
    pub valid: u64,
    pub skipped: u64,
    pub empty: u64,
}

/// Classifies every line of `reader` and appends the results to `sink`.
///
/// Lines are split on `\n` with a trailing `\r` removed. Records holding a
/// byte outside the 7-bit range are logged and skipped.
pub fn scan_corpus<R: BufRead, S: StreamSink + ?Sized>(
    mut reader: R,
    sink: &mut S,
) -> Result<ScanSummary> {
    let mut summary = ScanSummary::default();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        summary.lines += 1;

        let mut record = buffer.as_slice();
        if let Some(stripped) = record.strip_suffix(b"\n") {
            record = stripped;
        }
        if let Some(stripped) = record.strip_suffix(b"\r") {
            record = stripped;
        }

        if record.is_empty() {
            summary.empty += 1;
            debug!(event = "record_empty", line = summary.lines);
            continue;
        }

        match classify(record) {
            Ok(classification) => {
                classification.emit(sink)?;
                summary.valid += 1;
            }
            Err(source) => {
                summary.skipped += 1;
                let err = Error::InvalidRecord {
                    line: summary.lines as usize,
                    source,
                };
                warn!(
                    event = "record_skipped",
                    line = summary.lines,
                    error = %err,
                    "ignored record: {}",
                    String::from_utf8_lossy(record)
                );
            }
        }
    }

    info!(
        event = "classification_finished",
        lines = summary.lines,
        valid = summary.valid,
        skipped = summary.skipped,
        empty = summary.empty
    );

    Ok(summary)
}
