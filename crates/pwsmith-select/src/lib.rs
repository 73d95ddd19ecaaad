//! Frequency indexing and threshold selection for pwsmith.
//!
//! One algorithm, instantiated once per category: count the distinct values of
//! a category stream, rank them by count, and keep the high-frequency head
//! whose cumulative relative frequency stays below a threshold probability.

pub mod category;
pub mod errors;
pub mod frequency;
pub mod index;
pub mod report;
pub mod selector;
pub mod threshold;

pub use category::Category;
pub use errors::SelectError;
pub use frequency::FrequencyTable;
pub use index::CorpusIndex;
pub use report::{render_ranking, write_frequency_csv};
pub use selector::{RankedEntry, Ranking, Selection, SelectionSet, select};
pub use threshold::{DEFAULT_THRESHOLD, Probability};
