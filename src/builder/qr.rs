use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use crate::common::{
    color::Color,
    error::{QRError, QRResult},
    metadata::{ECLevel, Metadata, Version},
};

// Module
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Module {
    Dark,
    Light,
}

impl Module {
    pub fn select<T>(self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

impl From<qrcode::Color> for Module {
    fn from(c: qrcode::Color) -> Self {
        match c {
            qrcode::Color::Dark => Self::Dark,
            qrcode::Color::Light => Self::Light,
        }
    }
}

// QR
//------------------------------------------------------------------------------

/// An encoded symbol together with the styling it is rasterised with.
#[derive(Debug, Clone)]
pub struct QR {
    ver: Version,
    ecl: ECLevel,
    w: usize,
    grid: Vec<Module>,
    module_sz: u32,
    border: u32,
    fg: Color,
    bg: Color,
}

impl QR {
    pub(crate) fn new(
        ver: Version,
        ecl: ECLevel,
        grid: Vec<Module>,
        module_sz: u32,
        border: u32,
        fg: Color,
        bg: Color,
    ) -> Self {
        let w = ver.width();
        debug_assert!(grid.len() == w * w, "Grid len {} doesn't match width {w}", grid.len());
        Self { ver, ecl, w, grid, module_sz, border, fg, bg }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    /// Modules per side, excluding the quiet zone.
    pub fn width(&self) -> usize {
        self.w
    }

    pub fn module_size(&self) -> u32 {
        self.module_sz
    }

    pub fn border(&self) -> u32 {
        self.border
    }

    pub fn foreground(&self) -> Color {
        self.fg
    }

    pub fn background(&self) -> Color {
        self.bg
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.ver, self.ecl, None)
    }

    pub fn get(&self, r: usize, c: usize) -> Module {
        debug_assert!(r < self.w && c < self.w, "Module ({r}, {c}) outside {0}x{0} grid", self.w);
        self.grid[r * self.w + c]
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&&m| m == Module::Dark).count()
    }

    /// Side length in pixels of the rendered image, quiet zone included.
    pub fn image_size(&self) -> u32 {
        self.module_sz * (self.w as u32 + 2 * self.border)
    }
}

// Render
//------------------------------------------------------------------------------

impl QR {
    pub fn to_image(&self) -> RgbImage {
        let sz = self.image_size();
        let qz_sz = self.border * self.module_sz;
        let mut canvas = RgbImage::from_pixel(sz, sz, self.bg.to_rgb());

        let fg = self.fg.to_rgb();
        for r in 0..self.w {
            for c in 0..self.w {
                if self.get(r, c) == Module::Light {
                    continue;
                }
                let x = qz_sz + c as u32 * self.module_sz;
                let y = qz_sz + r as u32 * self.module_sz;
                let rect = Rect::at(x as i32, y as i32).of_size(self.module_sz, self.module_sz);
                draw_filled_rect_mut(&mut canvas, rect, fg);
            }
        }

        canvas
    }

    pub fn to_png(&self) -> QRResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.to_image().write_to(&mut buf, ImageFormat::Png).map_err(QRError::PngEncoding)?;
        Ok(buf.into_inner())
    }

    /// Terminal preview, two characters per module. Light modules are drawn
    /// solid so the symbol reads correctly on dark terminal backgrounds.
    pub fn render_as_string(&self) -> String {
        let qz = self.border as usize;
        let total = self.w + 2 * qz;

        let mut canvas = String::with_capacity(total * (total * 2 * 3 + 1));
        for i in 0..total {
            for j in 0..total {
                let inside = (qz..qz + self.w).contains(&i) && (qz..qz + self.w).contains(&j);
                let m = if inside { self.get(i - qz, j - qz) } else { Module::Light };
                canvas.push_str(m.select("  ", "██"));
            }
            canvas.push('\n');
        }
        canvas
    }
}
