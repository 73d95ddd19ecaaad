use std::collections::BTreeMap;

use pwsmith_core::{Stream, StreamSink};
use tracing::info;

use crate::category::Category;
use crate::frequency::FrequencyTable;
use crate::selector::Selection;
use crate::threshold::Probability;

/// Frequency tables for the four selectable categories of one corpus.
///
/// Fed by the classifier as a [`StreamSink`]; memory grows with the number
/// of distinct values, not with corpus length.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    tables: BTreeMap<Category, FrequencyTable>,
    patterns: u64,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: Category, value: &str) {
        self.tables.entry(category).or_default().record(value);
    }

    /// Replaces one category's table, e.g. when reloaded from an artifact.
    pub fn set_table(&mut self, category: Category, table: FrequencyTable) {
        self.tables.insert(category, table);
    }

    pub fn table(&self, category: Category) -> Option<&FrequencyTable> {
        self.tables.get(&category)
    }

    /// Number of full patterns seen, i.e. classified non-empty records.
    pub fn patterns(&self) -> u64 {
        self.patterns
    }

    pub fn select(&self, category: Category, threshold: Probability) -> Selection {
        let empty = FrequencyTable::new();
        let table = self.tables.get(&category).unwrap_or(&empty);
        let selection = Selection::from_table(category, table, threshold);
        info!(
            event = "selection_finished",
            category = %category,
            threshold = threshold.value(),
            distinct = selection.ranking.len(),
            total = selection.ranking.total(),
            selected = selection.size()
        );
        selection
    }
}

impl StreamSink for CorpusIndex {
    fn append(&mut self, stream: Stream, value: &str) -> pwsmith_core::Result<()> {
        match Category::from_stream(stream) {
            Some(category) => self.record(category, value),
            None => self.patterns += 1,
        }
        Ok(())
    }
}
