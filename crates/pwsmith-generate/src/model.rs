use pwsmith_core::{CondensedPattern, SymbolClass};
use pwsmith_select::{Category, SelectionSet};
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Options for forecasting and generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Average record size assumed by the byte estimate, newline included.
    pub bytes_per_record: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            bytes_per_record: 15,
        }
    }
}

/// The four selection sets the generator consumes, any of which may be absent.
#[derive(Debug, Clone, Default)]
pub struct SelectionBundle {
    pub patterns: Option<SelectionSet>,
    pub letters: Option<SelectionSet>,
    pub digits: Option<SelectionSet>,
    pub specials: Option<SelectionSet>,
}

impl SelectionBundle {
    pub fn get(&self, category: Category) -> Option<&SelectionSet> {
        match category {
            Category::Condensed => self.patterns.as_ref(),
            Category::Letters => self.letters.as_ref(),
            Category::Digits => self.digits.as_ref(),
            Category::Specials => self.specials.as_ref(),
        }
    }

    pub fn set(&mut self, selection: SelectionSet) {
        let slot = match selection.category {
            Category::Condensed => &mut self.patterns,
            Category::Letters => &mut self.letters,
            Category::Digits => &mut self.digits,
            Category::Specials => &mut self.specials,
        };
        *slot = Some(selection);
    }

    pub fn clear(&mut self, category: Category) {
        match category {
            Category::Condensed => self.patterns = None,
            Category::Letters => self.letters = None,
            Category::Digits => self.digits = None,
            Category::Specials => self.specials = None,
        }
    }

    /// Categories whose selection has not been produced.
    pub fn missing(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.get(*category).is_none())
            .collect()
    }

    /// Validates the bundle into generator input.
    ///
    /// Fails when a selection is missing, filed under the wrong category, or
    /// when a selected pattern is not a valid condensed pattern.
    pub fn to_input(&self) -> Result<GenerationInput, GenerationError> {
        let missing = self.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|category| category.name()).collect();
            return Err(GenerationError::MissingPrerequisite(format!(
                "no selection for {}; run the selection stage first",
                names.join(", ")
            )));
        }

        let mut input = GenerationInput::default();
        for category in Category::ALL {
            let Some(selection) = self.get(category) else {
                continue;
            };
            if selection.category != category {
                return Err(GenerationError::InvalidSelection(format!(
                    "expected {} selection, found {}",
                    category, selection.category
                )));
            }
            match category.class() {
                None => {
                    input.patterns = selection
                        .values()
                        .iter()
                        .map(|value| value.parse::<CondensedPattern>())
                        .collect::<Result<_, _>>()?;
                }
                Some(class) => *input.values_mut(class) = selection.values().to_vec(),
            }
        }
        Ok(input)
    }
}

/// Validated generator input: patterns plus one value list per class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationInput {
    pub patterns: Vec<CondensedPattern>,
    pub letters: Vec<String>,
    pub digits: Vec<String>,
    pub specials: Vec<String>,
}

impl GenerationInput {
    pub fn values(&self, class: SymbolClass) -> &[String] {
        match class {
            SymbolClass::Letter => &self.letters,
            SymbolClass::Digit => &self.digits,
            SymbolClass::Special => &self.specials,
        }
    }

    fn values_mut(&mut self, class: SymbolClass) -> &mut Vec<String> {
        match class {
            SymbolClass::Letter => &mut self.letters,
            SymbolClass::Digit => &mut self.digits,
            SymbolClass::Special => &mut self.specials,
        }
    }
}

/// Records produced for one selected pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternReport {
    pub pattern: String,
    pub records: u64,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    pub records_written: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub patterns: Vec<PatternReport>,
}
