use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SelectError;

/// Threshold used when neither the CLI nor the settings name one.
pub const DEFAULT_THRESHOLD: Probability = Probability(0.5);

/// Cumulative-frequency cutoff, always finite and within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    pub const ZERO: Probability = Probability(0.0);
    pub const ONE: Probability = Probability(1.0);

    pub fn new(value: f64) -> Result<Self, SelectError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SelectError::InvalidThreshold(format!(
                "{value} is not a probability between 0.0 and 1.0"
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Probability {
    fn default() -> Self {
        DEFAULT_THRESHOLD
    }
}

impl TryFrom<f64> for Probability {
    type Error = SelectError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(value: Probability) -> Self {
        value.0
    }
}

impl FromStr for Probability {
    type Err = SelectError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| SelectError::InvalidThreshold(format!("'{trimmed}' is not a number")))?;
        Self::new(value)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bounds_and_rejects_out_of_range() {
        assert_eq!("0".parse::<Probability>().expect("zero"), Probability::ZERO);
        assert_eq!(" 1.0 ".parse::<Probability>().expect("one"), Probability::ONE);
        assert_eq!("0.75".parse::<Probability>().expect("mid").value(), 0.75);
        assert!("1.01".parse::<Probability>().is_err());
        assert!("-0.1".parse::<Probability>().is_err());
        assert!("NaN".parse::<Probability>().is_err());
        assert!("inf".parse::<Probability>().is_err());
        assert!("half".parse::<Probability>().is_err());
        assert!("".parse::<Probability>().is_err());
    }

    #[test]
    fn display_keeps_the_exact_value() {
        assert_eq!(Probability::new(0.004).expect("small").to_string(), "0.004");
        assert_eq!(Probability::new(0.5).expect("half").to_string(), "0.5");
        assert_eq!(Probability::ONE.to_string(), "1");
    }
}
