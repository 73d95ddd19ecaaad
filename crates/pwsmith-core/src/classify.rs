use thiserror::Error;

use crate::error::Result;
use crate::pattern::{CondensedPattern, Pattern};
use crate::streams::{Stream, StreamSink};
use crate::symbol::SymbolClass;

/// Rejection of a record containing a byte outside the 7-bit range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("byte 0x{byte:02x} at offset {position} is outside the 7-bit range")]
pub struct InvalidRecord {
    pub position: usize,
    pub byte: u8,
}

/// Everything derived from a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub pattern: Pattern,
    pub condensed: CondensedPattern,
    pub letter_runs: Vec<String>,
    pub digit_runs: Vec<String>,
    pub special_runs: Vec<String>,
}

impl Classification {
    /// Appends every non-empty derived value to its category stream.
    pub fn emit<S: StreamSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        if !self.pattern.is_empty() {
            sink.append(Stream::Pattern, &self.pattern.to_string())?;
        }
        if !self.condensed.is_empty() {
            sink.append(Stream::Condensed, &self.condensed.to_string())?;
        }
        for run in &self.letter_runs {
            sink.append(Stream::Letters, run)?;
        }
        for run in &self.digit_runs {
            sink.append(Stream::Digits, run)?;
        }
        for run in &self.special_runs {
            sink.append(Stream::Specials, run)?;
        }
        Ok(())
    }
}

/// Classifies one raw record.
///
/// Letter and digit runs are split on every character of the other classes
/// (whitespace included). Special runs are taken after deleting ASCII
/// whitespace, so whitespace neither appears in nor separates them.
pub fn classify(record: &[u8]) -> std::result::Result<Classification, InvalidRecord> {
    if let Some(position) = record.iter().position(|byte| !byte.is_ascii()) {
        return Err(InvalidRecord {
            position,
            byte: record[position],
        });
    }

    let text: String = record.iter().map(|&byte| char::from(byte)).collect();
    let pattern = Pattern::new(record.iter().map(|&byte| SymbolClass::of_ascii(byte)).collect());
    let condensed = pattern.condense();

    let compact: String = text.chars().filter(|ch| !ch.is_ascii_whitespace()).collect();

    Ok(Classification {
        pattern,
        condensed,
        letter_runs: runs_of(&text, SymbolClass::Letter),
        digit_runs: runs_of(&text, SymbolClass::Digit),
        special_runs: runs_of(&compact, SymbolClass::Special),
    })
}

fn runs_of(text: &str, class: SymbolClass) -> Vec<String> {
    text.split(|ch: char| SymbolClass::of_char(ch) != Some(class))
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_letters_digits_and_specials() {
        let result = classify(b"love1982!").expect("valid record");
        assert_eq!(result.pattern.to_string(), "AAAA1111$");
        assert_eq!(result.condensed.to_string(), "A1$");
        assert_eq!(result.letter_runs, vec!["love"]);
        assert_eq!(result.digit_runs, vec!["1982"]);
        assert_eq!(result.special_runs, vec!["!"]);
    }

    #[test]
    fn whitespace_is_special_in_patterns_but_absorbed_in_special_runs() {
        let result = classify(b"ab #! 12 ?").expect("valid record");
        assert_eq!(result.pattern.to_string(), "AA$$$$11$$");
        assert_eq!(result.condensed.to_string(), "A$1$");
        assert_eq!(result.letter_runs, vec!["ab"]);
        assert_eq!(result.digit_runs, vec!["12"]);
        assert_eq!(result.special_runs, vec!["#!", "?"]);
    }

    #[test]
    fn whitespace_between_specials_does_not_split_them() {
        let result = classify(b"a! ?b").expect("valid record");
        assert_eq!(result.special_runs, vec!["!?"]);
        assert_eq!(result.pattern.to_string(), "A$$$A");
    }

    #[test]
    fn whitespace_separates_letter_runs() {
        let result = classify(b"hello world").expect("valid record");
        assert_eq!(result.letter_runs, vec!["hello", "world"]);
        assert!(result.special_runs.is_empty());
        assert_eq!(result.condensed.to_string(), "A$A");
    }

    #[test]
    fn repeated_runs_keep_left_to_right_order() {
        let result = classify(b"ab12cd34ab").expect("valid record");
        assert_eq!(result.letter_runs, vec!["ab", "cd", "ab"]);
        assert_eq!(result.digit_runs, vec!["12", "34"]);
        assert_eq!(result.condensed.to_string(), "A1A1A");
    }

    #[test]
    fn rejects_bytes_outside_seven_bit_range() {
        let err = classify("caf\u{e9}1".as_bytes()).expect_err("non-ascii record");
        assert_eq!(err.position, 3);
        assert_eq!(err.byte, 0xc3);
    }

    #[test]
    fn empty_record_yields_nothing() {
        let result = classify(b"").expect("empty record is valid");
        assert!(result.pattern.is_empty());
        assert!(result.condensed.is_empty());
        assert!(result.letter_runs.is_empty());
        assert!(result.digit_runs.is_empty());
        assert!(result.special_runs.is_empty());
    }
}
