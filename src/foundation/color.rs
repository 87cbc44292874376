use std::{fmt, str::FromStr};

use crate::foundation::error::{GongjuError, GongjuResult};

/// Straight (non-premultiplied) RGBA8 colour.
///
/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` and the small named palette offered by the watermark
/// picker. Serializes back to hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Named colours accepted wherever a colour string is expected.
pub const NAMED_COLORS: &[(&str, Rgba8)] = &[
    ("gray", Rgba8::rgb(0x80, 0x80, 0x80)),
    ("red", Rgba8::rgb(0xff, 0x00, 0x00)),
    ("white", Rgba8::rgb(0xff, 0xff, 0xff)),
    ("black", Rgba8::rgb(0x00, 0x00, 0x00)),
    ("orange", Rgba8::rgb(0xff, 0xa5, 0x00)),
    ("yellow", Rgba8::rgb(0xff, 0xff, 0x00)),
    ("green", Rgba8::rgb(0x00, 0x80, 0x00)),
    ("blue", Rgba8::rgb(0x00, 0x00, 0xff)),
    ("purple", Rgba8::rgb(0x80, 0x00, 0x80)),
    ("darkcyan", Rgba8::rgb(0x00, 0x8b, 0x8b)),
];

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque colour from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse a colour string.
    pub fn parse(s: &str) -> GongjuResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| {
                GongjuError::validation(format!("invalid hex colour '{s}'"))
            });
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, c)| *c)
            .ok_or_else(|| GongjuError::validation(format!("unknown colour '{s}'")))
    }

    /// `#rrggbb`, suitable for SVG `fill`/`stroke` (alpha goes in a separate opacity).
    pub fn svg_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0..=1 opacity.
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }

    pub fn to_image(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

fn parse_hex(hex: &str) -> Option<Rgba8> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nib = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba8::rgb(nib(0)?, nib(1)?, nib(2)?)),
        6 => Some(Rgba8::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba8 {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)?,
        }),
        _ => None,
    }
}

impl FromStr for Rgba8 {
    type Err = GongjuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = GongjuError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xff {
            write!(f, "{}", self.svg_rgb())
        } else {
            write!(f, "{}{:02x}", self.svg_rgb(), self.a)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
