use std::fmt;

use crate::numeral::NumeralError;

/// Character set used when spelling digits.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NumeralStyle {
    /// 大写: 壹贰叁 with 拾佰仟, as written on cheques and invoices.
    #[default]
    Financial,
    /// 小写: 一二三 with 十百千.
    Plain,
}

impl NumeralStyle {
    fn digits(self) -> &'static [char; 10] {
        match self {
            Self::Financial => &['零', '壹', '贰', '叁', '肆', '伍', '陆', '柒', '捌', '玖'],
            Self::Plain => &['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'],
        }
    }

    fn small_units(self) -> &'static [&'static str; 4] {
        match self {
            Self::Financial => &["", "拾", "佰", "仟"],
            Self::Plain => &["", "十", "百", "千"],
        }
    }
}

const LARGE_UNITS: [&str; 5] = ["", "万", "亿", "兆", "京"];
const FRACTION_UNITS: [&str; 4] = ["角", "分", "毫", "厘"];
const YUAN: &str = "元";
const WHOLE: &str = "整";
const NEGATIVE: &str = "负";

/// Amounts at or above this many integer digits are rejected.
const MAX_INTEGER_DIGITS: usize = 15;
const MAX_FRACTION_DIGITS: usize = FRACTION_UNITS.len();

/// A validated decimal amount ready to be spelled out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Amount {
    negative: bool,
    /// Integer digits without leading zeros; empty for zero.
    integer: String,
    /// At most four fraction digits, trailing zeros removed.
    fraction: String,
}

impl Amount {
    /// Parse a decimal string such as `"1024.5"`, `"-3"` or `".25"`.
    ///
    /// Fraction digits past the fourth (厘) are dropped, not rounded.
    pub fn parse(input: &str) -> Result<Self, NumeralError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(NumeralError::Empty);
        }

        let (negative, body) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };

        let mut parts = body.splitn(3, '.');
        let int_part = parts.next().unwrap_or_default();
        let frac_part = parts.next().unwrap_or_default();
        if parts.next().is_some() {
            return Err(NumeralError::Malformed(format!(
                "more than one decimal point in '{s}'"
            )));
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(NumeralError::Malformed(format!("no digits in '{s}'")));
        }
        if let Some(bad) = int_part
            .chars()
            .chain(frac_part.chars())
            .find(|c| !c.is_ascii_digit())
        {
            return Err(NumeralError::Malformed(format!(
                "unexpected character '{bad}' in '{s}'"
            )));
        }

        let integer = int_part.trim_start_matches('0').to_string();
        if integer.len() > MAX_INTEGER_DIGITS {
            return Err(NumeralError::OutOfRange {
                digits: integer.len(),
            });
        }

        let fraction = frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)]
            .trim_end_matches('0')
            .to_string();

        let is_zero = integer.is_empty() && fraction.is_empty();
        Ok(Self {
            negative: negative && !is_zero,
            integer,
            fraction,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.integer.is_empty() && self.fraction.is_empty()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Spell the amount as currency text, e.g. `壹仟零壹元整`.
    pub fn to_currency_text(&self, style: NumeralStyle) -> String {
        let digits = style.digits();
        if self.is_zero() {
            return format!("{}{YUAN}{WHOLE}", digits[0]);
        }

        let mut out = String::new();
        if self.negative {
            out.push_str(NEGATIVE);
        }

        if !self.integer.is_empty() {
            spell_integer(&self.integer, style, &mut out);
            out.push_str(YUAN);
        }

        if self.fraction.is_empty() {
            out.push_str(WHOLE);
        } else {
            for (unit, d) in FRACTION_UNITS.iter().zip(self.fraction.bytes()) {
                if d != b'0' {
                    out.push(digits[usize::from(d - b'0')]);
                    out.push_str(unit);
                }
            }
        }
        out
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        if self.integer.is_empty() {
            f.write_str("0")?;
        } else {
            f.write_str(&self.integer)?;
        }
        if !self.fraction.is_empty() {
            write!(f, ".{}", self.fraction)?;
        }
        Ok(())
    }
}

/// Spell `input` (a decimal string) as currency text.
pub fn to_currency_text(input: &str, style: NumeralStyle) -> Result<String, NumeralError> {
    Ok(Amount::parse(input)?.to_currency_text(style))
}

/// Spell a whole number without any currency suffix, e.g. `10010` -> `壹万零壹拾`.
pub fn to_numeral(value: u64, style: NumeralStyle) -> String {
    if value == 0 {
        return style.digits()[0].to_string();
    }
    let mut out = String::new();
    spell_integer(&value.to_string(), style, &mut out);
    out
}

/// Digits are walked most-significant first. A run of zeros collapses into a single 零 before the
/// next nonzero digit, and a four-digit group that is entirely zero drops its 万/亿 unit.
fn spell_integer(integer: &str, style: NumeralStyle, out: &mut String) {
    let digits = style.digits();
    let small = style.small_units();
    let len = integer.len();
    let mut zeros = 0usize;

    for (i, d) in integer.bytes().enumerate() {
        let pos = len - i - 1;
        let group = pos / 4;
        let within = pos % 4;

        if d == b'0' {
            zeros += 1;
        } else {
            if zeros > 0 {
                out.push(digits[0]);
            }
            zeros = 0;
            out.push(digits[usize::from(d - b'0')]);
            out.push_str(small[within]);
        }

        if within == 0 && zeros < 4 {
            out.push_str(LARGE_UNITS[group]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/numeral/currency.rs"]
mod tests;
