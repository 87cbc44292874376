pub(crate) mod currency;
pub(crate) mod keypad;

pub use currency::{Amount, NumeralStyle, to_currency_text, to_numeral};
pub use keypad::{AmountKeypad, KEYPAD_MAX_LEN, KeypadKey};

/// Reasons an amount string cannot be spelled out.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NumeralError {
    #[error("input is empty")]
    Empty,

    #[error("malformed amount: {0}")]
    Malformed(String),

    #[error("amount too large: {digits} integer digits (max 15)")]
    OutOfRange { digits: usize },
}
