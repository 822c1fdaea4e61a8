//! This module handles hex colours and the palette of the scene.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use tracing::debug;

/// The named colours of the scene.
pub mod palette {
    pub use hw_wish::DEFAULT_GLOW_COLOUR as ICE_GLOW;

    pub const BACKGROUND: &str = "#000810";
    pub const ARCTIC_BLUE: &str = "#00f2ff";
    pub const SAPPHIRE_DEEP: &str = "#0f3c8c";
    pub const SAPPHIRE_LITE: &str = "#4f8fff";
    pub const GOLD_METALLIC: &str = "#d4af37";
    pub const SILVER_METALLIC: &str = "#c0c0c0";
    pub const PLATINUM_BRIGHT: &str = "#e5e4e2";
    pub const PINE_DEEP: &str = "#0c3b2e";
    pub const BARK: &str = "#270d0d";
    pub const SNOW: &str = "#ffffff";
}

/// An error from parsing a hex colour.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ColourError {
    /// The string didn't start with `#`.
    #[error("colour {0:?} doesn't start with '#'")]
    MissingHash(String),

    /// There weren't 3 or 6 hex digits after the `#`.
    #[error("colour {0:?} should have 3 or 6 hex digits")]
    WrongLength(String),

    /// One of the digits wasn't hex.
    #[error("colour {0:?} contains a non-hex digit")]
    InvalidDigit(String),
}

/// An sRGB colour with 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Parse a palette colour, which is known to be valid.
    pub fn palette(hex: &'static str) -> Self {
        match hex.parse() {
            Ok(colour) => colour,
            Err(error) => unreachable!("Palette colour {hex} should be valid: {error}"),
        }
    }

    /// Parse the given hex colour, or use the fallback if it's invalid.
    pub fn parse_or(hex: &str, fallback: Rgb) -> Self {
        hex.parse().unwrap_or_else(|error: ColourError| {
            debug!(%error, "Using fallback colour");
            fallback
        })
    }

    /// The channels as floats between 0 and 1.
    pub fn to_f32_array(self) -> [f32; 3] {
        let [r, g, b] = self.0;
        [r as f32 / 255., g as f32 / 255., b as f32 / 255.]
    }
}

impl FromStr for Rgb {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColourError::MissingHash(s.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColourError::InvalidDigit(s.to_string()));
        }

        // All the digits are ASCII, so byte indexing is fine
        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColourError::InvalidDigit(s.to_string()))
        };

        match digits.len() {
            6 => Ok(Self([
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ])),
            3 => {
                let short = |i: usize| channel(&digits[i..=i]).map(|x| x * 17);
                Ok(Self([short(0)?, short(1)?, short(2)?]))
            }
            _ => Err(ColourError::WrongLength(s.to_string())),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}
