use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColourParseError {
    #[error("Colour must be 6 or 8 hex digits, got {0:?}")]
    InvalidLength(String),

    #[error("Colour contains non-hex digits: {0:?}")]
    InvalidDigit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BASELINE: Colour = Colour::new(0x32, 0x32, 0x32);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniformly sampled identity colour for a new reminder card.
    pub fn random() -> Self {
        Self::new(rand::random(), rand::random(), rand::random())
    }

    /// Tints `baseline` with a tenth of this colour, per channel.
    pub fn highlight_over(&self, baseline: Colour) -> Colour {
        Colour::new(
            baseline.r.saturating_add(self.r / 10),
            baseline.g.saturating_add(self.g / 10),
            baseline.b.saturating_add(self.b / 10),
        )
    }

    /// `0xRRGGBBAA` with a fully opaque alpha.
    pub fn to_hex_rgba(&self) -> String {
        format!("0x{:02x}{:02x}{:02x}ff", self.r, self.g, self.b)
    }
}

impl FromStr for Colour {
    type Err = ColourParseError;

    /// Accepts `0xRRGGBBAA`, `0xRRGGBB`, `#RRGGBB` or bare digits. Alpha is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .or_else(|| trimmed.strip_prefix('#'))
            .unwrap_or(trimmed);

        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColourParseError::InvalidLength(s.to_owned()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColourParseError::InvalidDigit(s.to_owned()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColourParseError::InvalidDigit(s.to_owned()))
        };

        Ok(Colour::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}
