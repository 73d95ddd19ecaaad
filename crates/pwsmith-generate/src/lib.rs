//! Size forecasting and cartesian corpus synthesis for pwsmith.
//!
//! Selected condensed patterns are filled with every combination of the
//! selected letter, digit and special runs. The output is streamed, so the
//! number of generated records is bounded by the forecast, never by memory.

pub mod errors;
pub mod forecast;
pub mod gate;
pub mod model;
pub mod output;
pub mod synth;

pub use errors::GenerationError;
pub use forecast::{Estimate, Forecast, forecast};
pub use gate::{Approver, GateOutcome, run_gated};
pub use model::{GenerateOptions, GenerationInput, GenerationReport, PatternReport, SelectionBundle};
pub use synth::{PatternRecords, Records, Synthesizer};
