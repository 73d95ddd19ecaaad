use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::symbol::SymbolClass;

/// Per-character class tags of one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pattern(Vec<SymbolClass>);

impl Pattern {
    pub fn new(classes: Vec<SymbolClass>) -> Self {
        Self(classes)
    }

    pub fn classes(&self) -> &[SymbolClass] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Collapses every maximal run of equal tags into a single tag.
    pub fn condense(&self) -> CondensedPattern {
        CondensedPattern::collapse(self.0.iter().copied())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tags(f, &self.0)
    }
}

impl FromStr for Pattern {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_tags(value).map(Self)
    }
}

/// A pattern in which no two adjacent tags are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CondensedPattern(Vec<SymbolClass>);

impl CondensedPattern {
    /// Builds a condensed pattern from any tag sequence, collapsing runs.
    pub fn collapse(classes: impl IntoIterator<Item = SymbolClass>) -> Self {
        let mut condensed: Vec<SymbolClass> = classes.into_iter().collect();
        condensed.dedup();
        Self(condensed)
    }

    pub fn classes(&self) -> &[SymbolClass] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn presence(&self) -> ClassPresence {
        let mut presence = ClassPresence::default();
        for class in &self.0 {
            presence.mark(*class);
        }
        presence
    }
}

impl fmt::Display for CondensedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tags(f, &self.0)
    }
}

impl FromStr for CondensedPattern {
    type Err = Error;

    /// Parses a tag string, rejecting adjacent duplicate tags.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let classes = parse_tags(value)?;
        if classes.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(Error::InvalidPattern(format!(
                "'{value}' repeats a tag and is not condensed"
            )));
        }
        Ok(Self(classes))
    }
}

impl TryFrom<String> for CondensedPattern {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CondensedPattern> for String {
    fn from(value: CondensedPattern) -> Self {
        value.to_string()
    }
}

/// Which symbol classes occur in a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassPresence {
    pub letter: bool,
    pub digit: bool,
    pub special: bool,
}

impl ClassPresence {
    pub fn mark(&mut self, class: SymbolClass) {
        match class {
            SymbolClass::Letter => self.letter = true,
            SymbolClass::Digit => self.digit = true,
            SymbolClass::Special => self.special = true,
        }
    }

    pub fn contains(&self, class: SymbolClass) -> bool {
        match class {
            SymbolClass::Letter => self.letter,
            SymbolClass::Digit => self.digit,
            SymbolClass::Special => self.special,
        }
    }
}

fn write_tags(f: &mut fmt::Formatter<'_>, classes: &[SymbolClass]) -> fmt::Result {
    for class in classes {
        write!(f, "{}", class.tag())?;
    }
    Ok(())
}

fn parse_tags(value: &str) -> Result<Vec<SymbolClass>, Error> {
    value
        .chars()
        .map(|tag| {
            SymbolClass::from_tag(tag)
                .ok_or_else(|| Error::InvalidPattern(format!("unknown tag '{tag}' in '{value}'")))
        })
        .collect()
}
