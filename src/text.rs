//! Byte buffer to text.

use std::borrow::Cow;

/// UTF-8 byte-order marker, as written by some Windows editors.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Decode bytes as UTF-8, dropping a leading byte-order marker.
///
/// Invalid sequences decode to U+FFFD rather than failing.
pub fn to_utf8(bytes: &[u8]) -> Cow<'_, str> {
    let body = bytes.strip_prefix(UTF8_BOM.as_slice()).unwrap_or(bytes);
    String::from_utf8_lossy(body)
}
