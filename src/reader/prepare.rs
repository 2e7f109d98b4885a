use image::{imageops, DynamicImage, GrayImage, ImageFormat, Luma};
use tracing::debug;

use crate::common::error::{QRError, QRResult};

pub const SUPPORTED_FORMATS: [ImageFormat; 4] =
    [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Gif];

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

// Images whose shorter side is below this are upscaled before detection
const MIN_SIDE: u32 = 400;
const MAX_UPSCALE: u32 = 8;
// Upscaling never takes the longer side past this
const MAX_SIDE: u32 = 4096;
const MIN_MARGIN: u32 = 16;
const MAX_MARGIN: u32 = 128;

// Loading
//------------------------------------------------------------------------------

/// Identifies the image format from its magic bytes.
pub fn detect_format(bytes: &[u8]) -> QRResult<ImageFormat> {
    let fmt = image::guess_format(bytes)?;
    if !SUPPORTED_FORMATS.contains(&fmt) {
        return Err(QRError::UnsupportedFormat(format!("{fmt:?}")));
    }
    Ok(fmt)
}

/// Decodes the bytes into an 8-bit grayscale buffer.
pub fn load(bytes: &[u8]) -> QRResult<GrayImage> {
    let fmt = detect_format(bytes)?;
    debug!(format = ?fmt, len = bytes.len(), "Decoding image...");
    let img = image::load_from_memory_with_format(bytes, fmt)?;
    Ok(to_luma(img))
}

// Transparent pixels are composited over white, so a code drawn on a
// transparent background keeps its contrast
fn to_luma(img: DynamicImage) -> GrayImage {
    if !img.color().has_alpha() {
        return img.to_luma8();
    }

    let mut rgba = img.to_rgba8();
    for px in rgba.pixels_mut() {
        let a = px[3] as u32;
        for c in px.0[..3].iter_mut() {
            *c = ((*c as u32 * a + 255 * (255 - a)) / 255) as u8;
        }
        px[3] = 255;
    }
    DynamicImage::ImageRgba8(rgba).to_luma8()
}

// Preparation
//------------------------------------------------------------------------------

/// Grayscale image ready for symbol detection, with the transform back to
/// the coordinates of the source image.
#[derive(Debug)]
pub struct PreparedImage {
    pub buffer: GrayImage,
    scale: u32,
    margin: u32,
}

impl PreparedImage {
    /// Upscales small images by an integer factor and pads the result with a
    /// white margin. Symbols with one pixel modules or no quiet zone are only
    /// located reliably after both steps.
    pub fn prepare(img: GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let (min_side, max_side) = (w.min(h).max(1), w.max(h).max(1));
        let scale = MIN_SIDE.div_ceil(min_side).min(MAX_UPSCALE).min(MAX_SIDE / max_side).max(1);

        let img = if scale > 1 {
            debug!(scale, "Upscaling image...");
            GrayImage::from_fn(w * scale, h * scale, |x, y| *img.get_pixel(x / scale, y / scale))
        } else {
            img
        };

        let (w, h) = img.dimensions();
        let margin = (w.min(h) / 8).clamp(MIN_MARGIN, MAX_MARGIN);
        let mut buffer = GrayImage::from_pixel(w + 2 * margin, h + 2 * margin, Luma([255]));
        imageops::replace(&mut buffer, &img, margin as i64, margin as i64);

        Self { buffer, scale, margin }
    }

    /// Maps a point of the prepared buffer back onto the source image.
    pub fn to_source(&self, x: i32, y: i32) -> (i32, i32) {
        let (m, s) = (self.margin as i32, self.scale as i32);
        ((x - m).div_euclid(s), (y - m).div_euclid(s))
    }
}
