use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::frequency::FrequencyTable;
use crate::threshold::Probability;

/// One distinct value at its rank, with its cumulative relative frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub value: String,
    pub count: u64,
    pub cumulative: f64,
}

/// Distinct values ordered by count descending, ties broken by value
/// descending in byte order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    entries: Vec<RankedEntry>,
    total: u64,
}

impl Ranking {
    pub fn from_table(table: &FrequencyTable) -> Self {
        let mut counted: Vec<(&str, u64)> = table.iter().collect();
        counted.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| b.0.as_bytes().cmp(a.0.as_bytes()))
        });

        let total = table.total();
        let mut running = 0_u64;
        let entries = counted
            .into_iter()
            .map(|(value, count)| {
                running += count;
                RankedEntry {
                    value: value.to_string(),
                    count,
                    cumulative: running as f64 / total as f64,
                }
            })
            .collect();

        Self { entries, total }
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of leading entries kept at `threshold`.
    ///
    /// With `k` entries whose cumulative frequency is below the threshold,
    /// `k + 1` entries are kept, capped at the number of entries. A non-empty
    /// ranking therefore always keeps its top entry, and keeps everything at 1.0.
    pub fn selection_size(&self, threshold: Probability) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        let below = self
            .entries
            .iter()
            .filter(|entry| entry.cumulative < threshold.value())
            .count();
        (below + 1).min(self.entries.len())
    }
}

/// The selected high-frequency values of one category, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSet {
    pub category: Category,
    pub threshold: Probability,
    pub values: Vec<String>,
}

impl SelectionSet {
    pub fn new(category: Category, threshold: Probability, values: Vec<String>) -> Self {
        Self {
            category,
            threshold,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A selection together with the full ranking it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub ranking: Ranking,
    pub set: SelectionSet,
}

impl Selection {
    pub fn from_table(category: Category, table: &FrequencyTable, threshold: Probability) -> Self {
        let ranking = Ranking::from_table(table);
        let size = ranking.selection_size(threshold);
        let values = ranking.entries()[..size]
            .iter()
            .map(|entry| entry.value.clone())
            .collect();
        Self {
            ranking,
            set: SelectionSet::new(category, threshold, values),
        }
    }

    pub fn size(&self) -> usize {
        self.set.len()
    }

    pub fn into_set(self) -> SelectionSet {
        self.set
    }
}

/// Counts `values` and selects the high-frequency head at `threshold`.
pub fn select<I, S>(category: Category, values: I, threshold: Probability) -> SelectionSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let table = FrequencyTable::from_values(values);
    Selection::from_table(category, &table, threshold).into_set()
}
