mod export;
mod qr;

pub use export::{export_filename, preview_text, EncodedImage, PNG_MIME_TYPE, PREVIEW_CHARS};
pub use qr::{Module, QR};

use std::ops::RangeInclusive;

use qrcode::QrCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::common::{
    color::Color,
    error::{QRError, QRResult},
    metadata::{ECLevel, Version},
};

pub const MODULE_SIZE_RANGE: RangeInclusive<u32> = 1..=20;
pub const BORDER_RANGE: RangeInclusive<u32> = 0..=10;
pub const DEFAULT_MODULE_SIZE: u32 = 10;
pub const DEFAULT_BORDER: u32 = 4;

// Builder
//------------------------------------------------------------------------------

pub struct QRBuilder<'a> {
    data: &'a str,
    module_sz: u32,
    border: u32,
    ec_level: ECLevel,
    fg: Color,
    bg: Color,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a str) -> Self {
        Self {
            data,
            module_sz: DEFAULT_MODULE_SIZE,
            border: DEFAULT_BORDER,
            ec_level: ECLevel::M,
            fg: Color::BLACK,
            bg: Color::WHITE,
        }
    }

    pub fn data(&mut self, data: &'a str) -> &mut Self {
        self.data = data;
        self
    }

    /// Pixels per module side, `1..=20`.
    pub fn module_size(&mut self, module_sz: u32) -> &mut Self {
        self.module_sz = module_sz;
        self
    }

    /// Quiet zone width in modules, `0..=10`.
    pub fn border(&mut self, border: u32) -> &mut Self {
        self.border = border;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn foreground(&mut self, fg: Color) -> &mut Self {
        self.fg = fg;
        self
    }

    pub fn background(&mut self, bg: Color) -> &mut Self {
        self.bg = bg;
        self
    }

    pub fn metadata(&self) -> String {
        format!(
            "{{ Ec level: {:?}, Module size: {}, Border: {}, Colors: {} on {} }}",
            self.ec_level, self.module_sz, self.border, self.fg, self.bg
        )
    }

    fn validate(&self) -> QRResult<()> {
        if self.data.is_empty() {
            return Err(QRError::EmptyData);
        }
        if !MODULE_SIZE_RANGE.contains(&self.module_sz) {
            return Err(QRError::InvalidModuleSize(self.module_sz));
        }
        if !BORDER_RANGE.contains(&self.border) {
            return Err(QRError::InvalidBorderWidth(self.border));
        }
        Ok(())
    }
}

impl QRBuilder<'_> {
    /// Encodes the data into the smallest version that holds it at the
    /// configured error correction level.
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());
        self.validate()?;

        debug!("Encoding data & finding best version...");
        let code = QrCode::with_error_correction_level(self.data.as_bytes(), self.ec_level.into())?;
        let ver = Version::try_from(code.version())?;

        debug!("Collecting modules...");
        let grid = code.to_colors().into_iter().map(Module::from).collect::<Vec<_>>();

        let qr = QR::new(ver, self.ec_level, grid, self.module_sz, self.border, self.fg, self.bg);

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        info!(
            version = *ver,
            width = qr.width(),
            image_size = qr.image_size(),
            data_len = self.data.len(),
            balance = dark_modules * 100 / total_modules,
            "QR generated"
        );

        Ok(qr)
    }
}


// Encode options
//------------------------------------------------------------------------------

/// Serialisable encode request. Colors are parsed when the options are
/// deserialised, so an `EncodeOptions` value always holds valid colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    pub content: String,
    pub module_size: u32,
    pub border_width: u32,
    pub ec_level: ECLevel,
    pub foreground: Color,
    pub background: Color,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            content: String::new(),
            module_size: DEFAULT_MODULE_SIZE,
            border_width: DEFAULT_BORDER,
            ec_level: ECLevel::M,
            foreground: Color::BLACK,
            background: Color::WHITE,
        }
    }
}

impl EncodeOptions {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), ..Default::default() }
    }

    pub fn builder(&self) -> QRBuilder<'_> {
        let mut builder = QRBuilder::new(&self.content);
        builder
            .module_size(self.module_size)
            .border(self.border_width)
            .ec_level(self.ec_level)
            .foreground(self.foreground)
            .background(self.background);
        builder
    }
}

/// Runs the encode pipeline and returns the symbol as PNG bytes.
pub fn encode(opts: &EncodeOptions) -> QRResult<EncodedImage> {
    let qr = opts.builder().build()?;
    EncodedImage::from_qr(&qr)
}
