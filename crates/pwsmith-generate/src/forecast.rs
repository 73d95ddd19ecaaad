use std::fmt;

use pwsmith_core::{CondensedPattern, SymbolClass};
use serde::{Deserialize, Serialize};

use crate::model::{GenerationInput, SelectionBundle};

/// Exact number of records the synthesizer would emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub records: u128,
    /// Set when the count exceeded `u128` and was clamped.
    pub saturated: bool,
}

impl Forecast {
    pub fn approx_bytes(&self, bytes_per_record: u64) -> u128 {
        self.records.saturating_mul(u128::from(bytes_per_record))
    }

}

/// Counts the records generated from `patterns` without generating them.
///
/// Each pattern contributes the product of the selection sizes of the
/// classes it contains; classes it lacks contribute a factor of one.
pub fn forecast(
    patterns: &[CondensedPattern],
    letters: usize,
    digits: usize,
    specials: usize,
) -> Forecast {
    let mut total = Forecast {
        records: 0,
        saturated: false,
    };
    for pattern in patterns {
        let (records, saturated) = pattern_records(pattern, letters, digits, specials);
        total.saturated |= saturated;
        match total.records.checked_add(records) {
            Some(sum) => total.records = sum,
            None => {
                total.records = u128::MAX;
                total.saturated = true;
            }
        }
    }
    total
}

/// Records generated from a single pattern, and whether the count saturated.
pub fn pattern_records(
    pattern: &CondensedPattern,
    letters: usize,
    digits: usize,
    specials: usize,
) -> (u128, bool) {
    let presence = pattern.presence();
    let mut product: u128 = 1;
    let mut saturated = false;
    for class in SymbolClass::ALL {
        if !presence.contains(class) {
            continue;
        }
        let size = match class {
            SymbolClass::Letter => letters,
            SymbolClass::Digit => digits,
            SymbolClass::Special => specials,
        } as u128;
        if size == 0 {
            return (0, false);
        }
        product = match product.checked_mul(size) {
            Some(value) => value,
            None => {
                saturated = true;
                u128::MAX
            }
        };
    }
    (product, saturated)
}

/// Forecast of a generation input, or the reason it cannot be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate {
    Known {
        forecast: Forecast,
        approx_bytes: u128,
    },
    Unknown {
        reason: String,
    },
}

impl Estimate {
    pub fn of_input(input: &GenerationInput, bytes_per_record: u64) -> Self {
        let forecast = forecast(
            &input.patterns,
            input.letters.len(),
            input.digits.len(),
            input.specials.len(),
        );
        Estimate::Known {
            forecast,
            approx_bytes: forecast.approx_bytes(bytes_per_record),
        }
    }

    /// Degrades to [`Estimate::Unknown`] instead of failing when the bundle
    /// is incomplete or invalid.
    pub fn of_bundle(bundle: &SelectionBundle, bytes_per_record: u64) -> Self {
        match bundle.to_input() {
            Ok(input) => Self::of_input(&input, bytes_per_record),
            Err(err) => Estimate::Unknown {
                reason: err.to_string(),
            },
        }
    }

    pub fn records(&self) -> Option<u128> {
        match self {
            Estimate::Known { forecast, .. } => Some(forecast.records),
            Estimate::Unknown { .. } => None,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Known {
                forecast,
                approx_bytes,
            } => {
                let bound = if forecast.saturated { "more than " } else { "" };
                write!(
                    f,
                    "{bound}{} record(s) to generate (that might be {:.3} MB)",
                    forecast.records,
                    *approx_bytes as f64 / 1_000_000.0
                )
            }
            Estimate::Unknown { reason } => {
                write!(f, "the size forecast cannot be computed: {reason}")
            }
        }
    }
}
