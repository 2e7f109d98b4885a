use std::path::PathBuf;

use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum QRError {
    // QR builder
    #[error("Empty data")]
    EmptyData,
    #[error("Invalid module size {0}, expected a value in 1..=20")]
    InvalidModuleSize(u32),
    #[error("Invalid border width {0}, expected a value in 0..=10")]
    InvalidBorderWidth(u32),
    #[error("Invalid error correction level {0:?}, expected one of L, M, Q, H")]
    InvalidECLevel(String),
    #[error("Invalid color {0:?}")]
    InvalidColor(String),
    #[error("Data too long to fit in a version 40 symbol")]
    DataTooLong,
    #[error("Failed to encode data: {0}")]
    Encoding(String),
    #[error("Failed to write PNG: {0}")]
    PngEncoding(#[source] image::ImageError),

    // QR reader
    #[error("Unsupported file extension {0:?}, expected one of jpg, jpeg, png, bmp, gif")]
    UnsupportedExtension(String),
    #[error("Unsupported image format {0}")]
    UnsupportedFormat(String),
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of [`QRError`] for callers that only care about
/// which side of the pipeline rejected the input.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    /// Missing or out of range input, rejected before any pipeline runs.
    Validation,
    /// Content or colors that cannot be turned into a QR image.
    Encoding,
    /// Bytes that are not a readable raster image.
    ImageDecode,
}

impl QRError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyData
            | Self::InvalidModuleSize(_)
            | Self::InvalidBorderWidth(_)
            | Self::InvalidECLevel(_)
            | Self::UnsupportedExtension(_) => ErrorKind::Validation,
            Self::InvalidColor(_) | Self::DataTooLong | Self::Encoding(_) | Self::PngEncoding(_) => {
                ErrorKind::Encoding
            }
            Self::UnsupportedFormat(_) | Self::ImageDecode(_) | Self::Io { .. } => {
                ErrorKind::ImageDecode
            }
        }
    }
}

impl From<qrcode::types::QrError> for QRError {
    fn from(err: qrcode::types::QrError) -> Self {
        match err {
            qrcode::types::QrError::DataTooLong => Self::DataTooLong,
            e => Self::Encoding(e.to_string()),
        }
    }
}

pub type QRResult<T> = Result<T, QRError>;
