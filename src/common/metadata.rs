use std::{
    fmt::{Display, Error, Formatter},
    ops::Deref,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::error::QRError;

// Version
//------------------------------------------------------------------------------

/// Normal QR version in `1..=40`.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Serialize)]
pub struct Version(pub(crate) usize);

impl Version {
    pub const MAX: Self = Self(40);

    /// Number of modules along one side of the symbol.
    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<qrcode::Version> for Version {
    type Error = QRError;

    fn try_from(v: qrcode::Version) -> Result<Self, Self::Error> {
        match v {
            qrcode::Version::Normal(v @ 1..=40) => Ok(Self(v as usize)),
            v => Err(QRError::Encoding(format!("unsupported symbol version {v:?}"))),
        }
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(
    Debug, Default, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ECLevel {
    L = 0,
    #[default]
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [Self; 4] = [Self::L, Self::M, Self::Q, Self::H];

    /// Approximate share of the symbol that can be damaged and still be read.
    pub const fn recovery_percent(self) -> u8 {
        match self {
            Self::L => 7,
            Self::M => 15,
            Self::Q => 25,
            Self::H => 30,
        }
    }

    // Format information bits as stored in the symbol
    pub(crate) fn from_format_bits(bits: u16) -> Option<Self> {
        match bits {
            0b01 => Some(Self::L),
            0b00 => Some(Self::M),
            0b11 => Some(Self::Q),
            0b10 => Some(Self::H),
            _ => None,
        }
    }
}

impl From<ECLevel> for qrcode::EcLevel {
    fn from(ecl: ECLevel) -> Self {
        match ecl {
            ECLevel::L => qrcode::EcLevel::L,
            ECLevel::M => qrcode::EcLevel::M,
            ECLevel::Q => qrcode::EcLevel::Q,
            ECLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for ECLevel {
    type Err = QRError;

    // Accepts the bare letter, its long name, or labels like "H (30%)"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let head = s.split_whitespace().next().unwrap_or_default();
        match head.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::L),
            "m" | "medium" => Ok(Self::M),
            "q" | "quartile" => Ok(Self::Q),
            "h" | "high" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel(s.to_string())),
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{:?} ({}%)", self, self.recovery_percent())
    }
}

// Metadata
//------------------------------------------------------------------------------

/// Version, error correction level and mask of an encoded or decoded symbol.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize)]
pub struct Metadata {
    pub version: Version,
    pub ec_level: ECLevel,
    pub mask: Option<u8>,
}

impl Metadata {
    pub fn new(version: Version, ec_level: ECLevel, mask: Option<u8>) -> Self {
        Self { version, ec_level, mask }
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(
            f,
            "{{ Version: {}, Width: {}, Ec level: {:?}",
            *self.version,
            self.version.width(),
            self.ec_level
        )?;
        if let Some(m) = self.mask {
            write!(f, ", Mask: {m}")?;
        }
        f.write_str(" }")
    }
}
