use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};

// Payload charset
//------------------------------------------------------------------------------

/// Converts a decoded payload into text. UTF-8 is tried first since that is
/// what virtually every generator writes into byte segments, then Shift_JIS
/// for Kanji segments, and finally ISO-8859-1, the charset QR byte mode
/// defaults to. The last step never fails.
pub fn decode_text(payload: &[u8]) -> String {
    if let Some(s) = UTF_8.decode_without_bom_handling_and_without_replacement(payload) {
        return s.into_owned();
    }
    if let Some(s) = SHIFT_JIS.decode_without_bom_handling_and_without_replacement(payload) {
        return s.into_owned();
    }
    // encoding_rs maps the ISO-8859-1 label onto windows-1252
    let (s, _) = WINDOWS_1252.decode_without_bom_handling(payload);
    s.into_owned()
}
