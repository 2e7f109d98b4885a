use std::{
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use image::Rgb;
use serde::{Deserialize, Serialize};

use super::error::QRError;

// Color
//------------------------------------------------------------------------------

/// An opaque RGB color, parsed once from `#RGB`, `#RRGGBB` or a basic CSS
/// color name.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }

    /// Rec. 601 luma, the same weighting `image` uses for grayscale conversion.
    pub fn luma(self) -> u8 {
        ((self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) / 1000) as u8
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let digit = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).ok();
        match hex.len() {
            3 => {
                let (r, g, b) = (digit(0, 1)?, digit(1, 1)?, digit(2, 1)?);
                Some(Self::new(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::new(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?)),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let c = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::new(255, 0, 0),
            "lime" => Self::new(0, 255, 0),
            "green" => Self::new(0, 128, 0),
            "blue" => Self::new(0, 0, 255),
            "yellow" => Self::new(255, 255, 0),
            "cyan" | "aqua" => Self::new(0, 255, 255),
            "magenta" | "fuchsia" => Self::new(255, 0, 255),
            "gray" | "grey" => Self::new(128, 128, 128),
            "silver" => Self::new(192, 192, 192),
            "maroon" => Self::new(128, 0, 0),
            "olive" => Self::new(128, 128, 0),
            "purple" => Self::new(128, 0, 128),
            "teal" => Self::new(0, 128, 128),
            "navy" => Self::new(0, 0, 128),
            "orange" => Self::new(255, 165, 0),
            _ => return None,
        };
        Some(c)
    }
}

impl FromStr for Color {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix('#') {
            Some(hex) => Self::from_hex(hex),
            None => Self::from_name(s),
        };
        parsed.ok_or_else(|| QRError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = QRError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
