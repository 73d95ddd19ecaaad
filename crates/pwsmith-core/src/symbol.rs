use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-way classification of a 7-bit character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolClass {
    Letter,
    Digit,
    Special,
}

impl SymbolClass {
    /// All classes in generation precedence order.
    pub const ALL: [SymbolClass; 3] = [SymbolClass::Letter, SymbolClass::Digit, SymbolClass::Special];

    /// Classifies a byte, or `None` when it lies outside the 7-bit range.
    pub fn of_byte(byte: u8) -> Option<Self> {
        if byte.is_ascii() {
            Some(Self::of_ascii(byte))
        } else {
            None
        }
    }

    /// Classifies a byte already known to be 7-bit.
    ///
    /// Anything that is neither an ASCII digit nor an ASCII letter is special,
    /// including whitespace and control characters.
    pub fn of_ascii(byte: u8) -> Self {
        if byte.is_ascii_digit() {
            SymbolClass::Digit
        } else if byte.is_ascii_alphabetic() {
            SymbolClass::Letter
        } else {
            SymbolClass::Special
        }
    }

    pub fn of_char(ch: char) -> Option<Self> {
        u8::try_from(ch).ok().and_then(Self::of_byte)
    }

    /// Single-character tag used in pattern artifacts.
    pub const fn tag(self) -> char {
        match self {
            SymbolClass::Letter => 'A',
            SymbolClass::Digit => '1',
            SymbolClass::Special => '$',
        }
    }

    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'A' => Some(SymbolClass::Letter),
            '1' => Some(SymbolClass::Digit),
            '$' => Some(SymbolClass::Special),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SymbolClass::Letter => "letter",
            SymbolClass::Digit => "digit",
            SymbolClass::Special => "special",
        }
    }
}

impl fmt::Display for SymbolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_ascii_ranges() {
        assert_eq!(SymbolClass::of_byte(b'0'), Some(SymbolClass::Digit));
        assert_eq!(SymbolClass::of_byte(b'9'), Some(SymbolClass::Digit));
        assert_eq!(SymbolClass::of_byte(b'a'), Some(SymbolClass::Letter));
        assert_eq!(SymbolClass::of_byte(b'Z'), Some(SymbolClass::Letter));
        assert_eq!(SymbolClass::of_byte(b' '), Some(SymbolClass::Special));
        assert_eq!(SymbolClass::of_byte(b'\t'), Some(SymbolClass::Special));
        assert_eq!(SymbolClass::of_byte(b'~'), Some(SymbolClass::Special));
        assert_eq!(SymbolClass::of_byte(0x7f), Some(SymbolClass::Special));
        assert_eq!(SymbolClass::of_byte(0x80), None);
        assert_eq!(SymbolClass::of_byte(0xe9), None);
    }

    #[test]
    fn tags_round_trip() {
        for class in SymbolClass::ALL {
            assert_eq!(SymbolClass::from_tag(class.tag()), Some(class));
        }
        assert_eq!(SymbolClass::from_tag('x'), None);
    }
}
