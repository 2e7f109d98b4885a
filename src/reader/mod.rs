mod prepare;
mod text;

pub use prepare::{detect_format, PreparedImage, SUPPORTED_EXTENSIONS, SUPPORTED_FORMATS};

use std::path::Path;

use image::GrayImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::common::{
    error::{QRError, QRResult},
    metadata::{ECLevel, Metadata, Version},
};
use text::decode_text;

const URL_PREFIXES: [&str; 3] = ["http://", "https://", "www."];

/// True when the text starts like a link. This is a prefix check only, the
/// text is not validated as a URL.
pub fn is_url_like(text: &str) -> bool {
    URL_PREFIXES.iter().any(|p| text.starts_with(p))
}

// Decode result
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A successfully decoded symbol.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Symbol {
    pub text: String,
    pub url_like: bool,
    pub metadata: Metadata,
    /// Corners in source image pixels, clockwise from the top left finder.
    pub bounds: [Point; 4],
}

/// Outcome of the decode pipeline. A missing code is a normal result, not
/// an error.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decoded {
    Found(Symbol),
    NotFound,
}

impl Decoded {
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Found(s) => Some(s),
            Self::NotFound => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.symbol().map(|s| s.text.as_str())
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_url_like(&self) -> bool {
        self.symbol().is_some_and(|s| s.url_like)
    }
}

// Reader
//------------------------------------------------------------------------------

pub struct QRReader();

impl QRReader {
    /// Reads the first decodable symbol from JPEG, PNG, BMP or GIF bytes.
    pub fn read(bytes: &[u8]) -> QRResult<Decoded> {
        debug!("Reading QR...");
        let img = prepare::load(bytes)?;
        Ok(Self::read_luma(img))
    }

    /// Reads the first decodable symbol from an already decoded grayscale image.
    pub fn read_luma(img: GrayImage) -> Decoded {
        let min_side = img.width().min(img.height()) as usize;
        if min_side < Version(1).width() {
            info!(min_side, "Image too small to hold a QR code");
            return Decoded::NotFound;
        }

        debug!("Preparing image...");
        let prep = PreparedImage::prepare(img);
        let buf = &prep.buffer;

        debug!("Locating symbols...");
        let mut rqrr_img = rqrr::PreparedImage::prepare_from_greyscale(
            buf.width() as usize,
            buf.height() as usize,
            |x, y| buf.get_pixel(x as u32, y as u32)[0],
        );
        let grids = rqrr_img.detect_grids();
        debug!(candidates = grids.len(), "Decoding candidates...");

        for (i, grid) in grids.iter().enumerate() {
            let mut payload = Vec::new();
            let meta = match grid.decode_to(&mut payload) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(candidate = i, error = %e, "Failed to decode candidate");
                    continue;
                }
            };
            let Some(ecl) = ECLevel::from_format_bits(meta.ecc_level) else {
                warn!(candidate = i, bits = meta.ecc_level, "Unknown error correction level");
                continue;
            };

            let text = decode_text(&payload);
            let metadata = Metadata::new(Version(meta.version.0), ecl, Some(meta.mask as u8));
            let corners = symbol_corners(&grid.bounds, metadata.version.width());
            let bounds = corners.map(|(x, y)| {
                let (x, y) = prep.to_source(x, y);
                Point { x, y }
            });
            info!(%metadata, len = text.len(), "QR decoded");

            return Decoded::Found(Symbol { url_like: is_url_like(&text), text, metadata, bounds });
        }

        info!("No QR code detected");
        Decoded::NotFound
    }
}

// The located grid extends one module past the symbol on its right and
// bottom edges. Pulls those corners back towards the top left corner.
fn symbol_corners(grid: &[rqrr::Point; 4], width: usize) -> [(i32, i32); 4] {
    let (ox, oy) = (grid[0].x as f64, grid[0].y as f64);
    let k = width as f64 / (width + 1) as f64;
    let mut corners = [(grid[0].x, grid[0].y); 4];
    for (c, p) in corners.iter_mut().zip(grid).skip(1) {
        let x = ox + (p.x as f64 - ox) * k;
        let y = oy + (p.y as f64 - oy) * k;
        *c = (x.round() as i32, y.round() as i32);
    }
    corners
}

pub fn decode(bytes: &[u8]) -> QRResult<Decoded> {
    QRReader::read(bytes)
}

/// Reads an image file whose extension is one of [`SUPPORTED_EXTENSIONS`].
pub fn decode_file(path: impl AsRef<Path>) -> QRResult<Decoded> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(QRError::UnsupportedExtension(ext));
    }

    let bytes = std::fs::read(path)
        .map_err(|source| QRError::Io { path: path.to_path_buf(), source })?;
    decode(&bytes)
}

#[cfg(test)]
mod reader_tests {
    use std::io::Cursor;

    use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
    use test_case::test_case;

    use super::{decode, decode_file, is_url_like, Decoded, QRReader};
    use crate::{
        builder::{encode, EncodeOptions, QRBuilder},
        common::{Color, ECLevel, ErrorKind, QRError},
    };

    #[test_case("http://example.com", true)]
    #[test_case("https://example.com", true)]
    #[test_case("www.example.com", true)]
    #[test_case("hello world", false)]
    #[test_case("HTTPS://EXAMPLE.COM", false)]
    #[test_case("ftp://example.com", false)]
    #[test_case("https://", true; "bare prefix")]
    fn test_is_url_like(text: &str, exp: bool) {
        assert_eq!(is_url_like(text), exp);
    }

    #[test]
    fn test_reader_0() {
        let enc = encode(&EncodeOptions::new("TEST123")).unwrap();
        let res = decode(&enc.png).unwrap();

        assert!(res.is_found());
        let sym = res.symbol().expect("No symbol found");
        assert_eq!(sym.text, "TEST123");
        assert!(!sym.url_like);
        assert_eq!(sym.metadata.version, enc.metadata.version);
        assert_eq!(sym.metadata.ec_level, ECLevel::M);
    }

    #[test]
    fn test_reader_bounds() {
        let qr = QRBuilder::new("bounds").module_size(5).border(4).build().unwrap();
        let img = DynamicImage::ImageRgb8(qr.to_image()).to_luma8();
        let res = QRReader::read_luma(img);

        let sym = res.symbol().expect("No symbol found");
        // Symbol spans the grid inside the 20px quiet zone
        let (lo, hi) = (20, 20 + qr.width() as i32 * 5);
        let exp = [(lo, lo), (hi, lo), (hi, hi), (lo, hi)];
        for (p, (x, y)) in sym.bounds.iter().zip(exp) {
            assert!((p.x - x).abs() <= 2 && (p.y - y).abs() <= 2, "{:?} != {exp:?}", sym.bounds);
        }
    }

    #[test_case(5, 4)]
    #[test_case(10, 4)]
    #[test_case(20, 10)]
    #[test_case(3, 0)]
    fn test_reader_bounds_extent(module_sz: u32, border: u32) {
        let qr = QRBuilder::new("bounds").module_size(module_sz).border(border).build().unwrap();
        let res = decode(&qr.to_png().unwrap()).unwrap();

        let sym = res.symbol().expect("No symbol found");
        let lo = (border * module_sz) as i32;
        let hi = lo + (qr.width() as u32 * module_sz) as i32;
        let tol = module_sz as i32 / 2 + 1;
        let xs = sym.bounds.map(|p| p.x);
        let ys = sym.bounds.map(|p| p.y);
        assert!((xs.iter().min().unwrap() - lo).abs() <= tol, "{:?}", sym.bounds);
        assert!((xs.iter().max().unwrap() - hi).abs() <= tol, "{:?}", sym.bounds);
        assert!((ys.iter().min().unwrap() - lo).abs() <= tol, "{:?}", sym.bounds);
        assert!((ys.iter().max().unwrap() - hi).abs() <= tol, "{:?}", sym.bounds);
    }

    #[test_case(200_000, 1; "one pixel high")]
    #[test_case(20, 5_000; "narrower than a symbol")]
    fn test_reader_thin_image(w: u32, h: u32) {
        let img = GrayImage::from_pixel(w, h, Luma([255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        let res = decode(buf.get_ref()).unwrap();
        assert!(!res.is_found());
        assert_eq!(res, Decoded::NotFound);
    }

    #[test]
    fn test_reader_url() {
        let enc = encode(&EncodeOptions::new("https://example.com")).unwrap();
        let res = decode(&enc.png).unwrap();
        assert_eq!(res.text(), Some("https://example.com"));
        assert!(res.is_url_like());
    }

    #[test_case(Color::WHITE; "white")]
    #[test_case(Color::BLACK; "black")]
    #[test_case(Color::new(30, 136, 229); "blue")]
    fn test_solid_image_not_found(c: Color) {
        let img = RgbImage::from_pixel(300, 300, c.to_rgb());
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();

        assert_eq!(decode(buf.get_ref()).unwrap(), Decoded::NotFound);
    }

    #[test]
    fn test_noise_not_found() {
        // Deterministic checkerboard of 3px cells, no finder patterns anywhere
        let img = GrayImage::from_fn(240, 240, |x, y| {
            Luma([if (x / 3 + y / 3) % 2 == 0 { 0 } else { 255 }])
        });
        assert_eq!(QRReader::read_luma(img), Decoded::NotFound);
    }

    #[test]
    fn test_malformed_bytes() {
        let err = decode(b"GIF89a\x00\x00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImageDecode);
    }

    #[test]
    fn test_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.PNG");
        let qr = QRBuilder::new("from disk").build().unwrap();
        std::fs::write(&path, qr.to_png().unwrap()).unwrap();

        assert_eq!(decode_file(&path).unwrap().text(), Some("from disk"));
    }

    #[test]
    fn test_decode_file_jpeg_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.jpg");
        let qr = QRBuilder::new("lossy").module_size(8).build().unwrap();
        DynamicImage::ImageRgb8(qr.to_image()).save_with_format(&path, ImageFormat::Jpeg).unwrap();

        assert_eq!(decode_file(&path).unwrap().text(), Some("lossy"));
    }

    #[test]
    fn test_decode_file_errors() {
        let err = decode_file("code.webp").unwrap_err();
        assert!(matches!(err, QRError::UnsupportedExtension(ref e) if e == "webp"));
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = decode_file("no_extension").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let dir = tempfile::tempdir().unwrap();
        let err = decode_file(dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, QRError::Io { .. }));
        assert_eq!(err.kind(), ErrorKind::ImageDecode);
    }

    #[test]
    fn test_serialize() {
        let res = Decoded::NotFound;
        assert_eq!(serde_json::to_string(&res).unwrap(), r#"{"status":"not_found"}"#);

        let enc = encode(&EncodeOptions::new("www.example.com")).unwrap();
        let json = serde_json::to_value(decode(&enc.png).unwrap()).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["text"], "www.example.com");
        assert_eq!(json["url_like"], true);
        assert_eq!(json["metadata"]["ec_level"], "M");
    }
}
