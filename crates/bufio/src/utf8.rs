//! Single-scalar UTF-8 helpers shared by the reader and the rune splitter.

/// The replacement character reported for invalid input.
pub(crate) const REPLACEMENT: char = '\u{FFFD}';

/// Decodes the first scalar value of `bytes`.
///
/// Invalid or truncated input decodes to [`REPLACEMENT`] with a width of
/// one byte, so a decoder always makes progress. Returns `None` only for
/// empty input.
pub(crate) fn decode(bytes: &[u8]) -> Option<(char, usize)> {
    match bstr::decode_utf8(bytes) {
        (_, 0) => None,
        (Some(ch), len) => Some((ch, len)),
        (None, _) => Some((REPLACEMENT, 1)),
    }
}

/// Whether `bytes` begins with a complete encoding, or with an encoding
/// that is already known to be invalid. Only a valid but truncated prefix
/// is not full.
pub(crate) fn full_rune(bytes: &[u8]) -> bool {
    let Some(&lead) = bytes.first() else {
        return false;
    };
    let width = match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return true,
    };
    if bytes.len() >= width {
        return true;
    }
    // bstr reports the maximal valid prefix; if that is all we have, the
    // sequence may still complete.
    bstr::decode_utf8(bytes).1 < bytes.len()
}
