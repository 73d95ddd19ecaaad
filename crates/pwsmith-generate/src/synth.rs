use std::io::Write;
use std::time::Instant;

use pwsmith_core::{CondensedPattern, SymbolClass};
use tracing::{debug, info};

use crate::errors::GenerationError;
use crate::model::{GenerationInput, GenerationReport, PatternReport};
use crate::output::CountingWriter;

/// Lazily enumerates the records of one pattern.
///
/// Dimensions are nested letter (outer), digit, special (inner). A class
/// absent from the pattern is a single placeholder; a class present with an
/// empty selection yields no records at all. Every occurrence of a class in
/// the pattern receives the same value within one record.
#[derive(Debug, Clone)]
pub struct PatternRecords<'a> {
    pattern: &'a CondensedPattern,
    dims: [Option<&'a [String]>; 3],
    cursor: [usize; 3],
    done: bool,
}

impl<'a> PatternRecords<'a> {
    pub fn new(pattern: &'a CondensedPattern, input: &'a GenerationInput) -> Self {
        let presence = pattern.presence();
        let mut dims = [None; 3];
        let mut done = false;
        for (slot, class) in dims.iter_mut().zip(SymbolClass::ALL) {
            if presence.contains(class) {
                let values = input.values(class);
                done |= values.is_empty();
                *slot = Some(values);
            }
        }
        Self {
            pattern,
            dims,
            cursor: [0; 3],
            done,
        }
    }

    fn render(&self) -> String {
        let mut record = String::new();
        for class in self.pattern.classes() {
            let slot = class_slot(*class);
            if let Some(values) = self.dims[slot] {
                record.push_str(&values[self.cursor[slot]]);
            }
        }
        record
    }

    /// Advances the innermost dimension, carrying outward.
    fn advance(&mut self) {
        for slot in (0..self.dims.len()).rev() {
            let Some(values) = self.dims[slot] else {
                continue;
            };
            self.cursor[slot] += 1;
            if self.cursor[slot] < values.len() {
                return;
            }
            self.cursor[slot] = 0;
        }
        self.done = true;
    }
}

impl Iterator for PatternRecords<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let record = self.render();
        self.advance();
        Some(record)
    }
}

fn class_slot(class: SymbolClass) -> usize {
    match class {
        SymbolClass::Letter => 0,
        SymbolClass::Digit => 1,
        SymbolClass::Special => 2,
    }
}

/// Records of every selected pattern, in selection order.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    input: &'a GenerationInput,
    next_pattern: usize,
    current: Option<PatternRecords<'a>>,
}

impl<'a> Iterator for Records<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.current.as_mut().and_then(Iterator::next) {
                return Some(record);
            }
            let pattern = self.input.patterns.get(self.next_pattern)?;
            self.next_pattern += 1;
            self.current = Some(PatternRecords::new(pattern, self.input));
        }
    }
}

/// Cartesian synthesizer over a validated generation input.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    input: &'a GenerationInput,
}

impl<'a> Synthesizer<'a> {
    pub fn new(input: &'a GenerationInput) -> Self {
        Self { input }
    }

    pub fn records(&self) -> Records<'a> {
        Records {
            input: self.input,
            next_pattern: 0,
            current: None,
        }
    }

    /// Streams every record to `writer`, one per line.
    ///
    /// Nothing is buffered beyond the writer itself; memory use does not
    /// depend on the number of records.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<GenerationReport, GenerationError> {
        let start = Instant::now();
        let mut writer = CountingWriter::new(writer);
        let mut report = GenerationReport::default();

        info!(
            event = "generation_started",
            patterns = self.input.patterns.len(),
            letters = self.input.letters.len(),
            digits = self.input.digits.len(),
            specials = self.input.specials.len()
        );

        for pattern in &self.input.patterns {
            let mut records = 0_u64;
            for record in PatternRecords::new(pattern, self.input) {
                writer.write_all(record.as_bytes())?;
                writer.write_all(b"\n")?;
                records += 1;
            }
            debug!(event = "pattern_generated", pattern = %pattern, records);
            report.records_written += records;
            report.patterns.push(PatternReport {
                pattern: pattern.to_string(),
                records,
            });
        }

        writer.flush()?;
        report.bytes_written = writer.bytes_written();
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            event = "generation_finished",
            records = report.records_written,
            bytes = report.bytes_written,
            duration_ms = report.duration_ms
        );

        Ok(report)
    }
}
