use std::fmt;
use std::str::FromStr;

use pwsmith_core::{Stream, SymbolClass};
use serde::{Deserialize, Serialize};

use crate::errors::SelectError;

/// A selectable category: condensed patterns or the runs of one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Condensed,
    Letters,
    Digits,
    Specials,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Condensed,
        Category::Letters,
        Category::Digits,
        Category::Specials,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Category::Condensed => "condensed",
            Category::Letters => "letters",
            Category::Digits => "digits",
            Category::Specials => "specials",
        }
    }

    pub const fn stream(self) -> Stream {
        match self {
            Category::Condensed => Stream::Condensed,
            Category::Letters => Stream::Letters,
            Category::Digits => Stream::Digits,
            Category::Specials => Stream::Specials,
        }
    }

    pub fn from_stream(stream: Stream) -> Option<Self> {
        match stream {
            Stream::Pattern => None,
            Stream::Condensed => Some(Category::Condensed),
            Stream::Letters => Some(Category::Letters),
            Stream::Digits => Some(Category::Digits),
            Stream::Specials => Some(Category::Specials),
        }
    }

    /// The symbol class whose runs this category holds.
    pub const fn class(self) -> Option<SymbolClass> {
        match self {
            Category::Condensed => None,
            Category::Letters => Some(SymbolClass::Letter),
            Category::Digits => Some(SymbolClass::Digit),
            Category::Specials => Some(SymbolClass::Special),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = SelectError;

    /// Accepts the category name and the short aliases used in the shell.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "condensed" | "cpatt" | "patterns" | "2a" => Ok(Category::Condensed),
            "letters" | "let" | "2b" => Ok(Category::Letters),
            "digits" | "num" | "numbers" | "2c" => Ok(Category::Digits),
            "specials" | "spec" | "2d" => Ok(Category::Specials),
            other => Err(SelectError::UnknownCategory(other.to_string())),
        }
    }
}
