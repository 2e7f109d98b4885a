use time::OffsetDateTime;

use super::qr::QR;
use crate::common::{error::QRResult, metadata::Metadata};

pub const PNG_MIME_TYPE: &str = "image/png";

/// Length of the encoded data preview shown next to a generated code.
pub const PREVIEW_CHARS: usize = 50;

/// Output of the encode pipeline: a PNG image and its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub metadata: Metadata,
}

impl EncodedImage {
    pub fn from_qr(qr: &QR) -> QRResult<Self> {
        let sz = qr.image_size();
        Ok(Self { png: qr.to_png()?, width: sz, height: sz, metadata: qr.metadata() })
    }

    pub fn mime_type(&self) -> &'static str {
        PNG_MIME_TYPE
    }
}

/// Download name for a generated code, `qrcode_<YYYYMMDD>_<HHMMSS>.<ext>`.
pub fn export_filename(at: OffsetDateTime, ext: &str) -> String {
    format!(
        "qrcode_{:04}{:02}{:02}_{:02}{:02}{:02}.{ext}",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

/// Current local time, or UTC when the local offset can't be determined
/// (e.g. in multi-threaded processes on some Unix platforms).
pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

impl QR {
    pub fn export_filename(&self) -> String {
        export_filename(now(), "png")
    }
}

/// Truncates `text` to `max_chars` characters, appending `...` when cut.
pub fn preview_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod export_tests {
    use time::macros::datetime;

    use super::{export_filename, preview_text, PREVIEW_CHARS};
    use crate::builder::QRBuilder;

    #[test]
    fn test_export_filename() {
        let at = datetime!(2024-03-07 9:05:01 UTC);
        assert_eq!(export_filename(at, "png"), "qrcode_20240307_090501.png");
    }

    #[test]
    fn test_qr_export_filename_pattern() {
        let qr = QRBuilder::new("OK").build().unwrap();
        let name = qr.export_filename();
        assert_eq!(name.len(), "qrcode_YYYYMMDD_HHMMSS.png".len());
        assert!(name.starts_with("qrcode_") && name.ends_with(".png"));
        assert!(name[7..15].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(&name[15..16], "_");
        assert!(name[16..22].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_preview_text() {
        assert_eq!(preview_text("short", PREVIEW_CHARS), "short");
        let long = "a".repeat(60);
        assert_eq!(preview_text(&long, PREVIEW_CHARS), format!("{}...", "a".repeat(50)));
        assert_eq!(preview_text(&"b".repeat(50), PREVIEW_CHARS), "b".repeat(50));
        assert_eq!(preview_text("héllo wörld", 4), "héll...");
    }
}
