use crate::numeral::{NumeralError, NumeralStyle, currency::Amount};

/// Longest buffer the keypad accepts, decimal point included.
pub const KEYPAD_MAX_LEN: usize = 13;
const KEYPAD_MAX_FRACTION: usize = 2;

/// A single keypad button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeypadKey {
    Digit(u8),
    Point,
}

impl KeypadKey {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Self::Point),
            '0'..='9' => Some(Self::Digit(c as u8 - b'0')),
            _ => None,
        }
    }

    /// `None` for a digit outside `0..=9`.
    fn as_char(self) -> Option<char> {
        match self {
            Self::Digit(d) => char::from_digit(u32::from(d), 10),
            Self::Point => Some('.'),
        }
    }
}

/// Input buffer behind the "number to capitals" keypad.
///
/// Holds at most [`KEYPAD_MAX_LEN`] characters with at most two fraction digits (分 precision),
/// so the buffer always parses as an [`Amount`].
#[derive(Clone, Debug)]
pub struct AmountKeypad {
    buffer: String,
    style: NumeralStyle,
}

impl Default for AmountKeypad {
    fn default() -> Self {
        Self::new(NumeralStyle::Financial)
    }
}

impl AmountKeypad {
    pub fn new(style: NumeralStyle) -> Self {
        Self {
            buffer: "0".to_string(),
            style,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Apply a key press. Returns `false` when the key was ignored.
    pub fn press(&mut self, key: KeypadKey) -> bool {
        let Some(c) = key.as_char() else {
            return false;
        };
        let fraction_len = self.buffer.split_once('.').map(|(_, f)| f.len());
        if fraction_len.is_some() && key == KeypadKey::Point {
            return false;
        }
        if fraction_len == Some(KEYPAD_MAX_FRACTION) {
            return false;
        }
        if self.buffer.len() >= KEYPAD_MAX_LEN {
            return false;
        }

        if self.buffer == "0" && key != KeypadKey::Point {
            self.buffer.clear();
        }
        self.buffer.push(c);
        true
    }

    /// Feed every recognised character of `keys`; returns how many were accepted.
    pub fn type_str(&mut self, keys: &str) -> usize {
        keys.chars()
            .filter_map(KeypadKey::from_char)
            .filter(|k| self.press(*k))
            .count()
    }

    /// Remove the last character, resetting to `"0"` when nothing would remain.
    pub fn back(&mut self) {
        if self.buffer.len() <= 1 {
            self.clear();
            return;
        }
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.buffer.push('0');
    }

    /// Current rendering of the buffer, e.g. `零元整` for a fresh keypad.
    pub fn text(&self) -> Result<String, NumeralError> {
        Ok(Amount::parse(&self.buffer)?.to_currency_text(self.style))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/numeral/keypad.rs"]
mod tests;
