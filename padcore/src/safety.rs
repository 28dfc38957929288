//! Panic-free string indexing.
//!
//! egui text cursors count characters, Rust strings index bytes. Every
//! conversion between the two goes through here so no edit can slice a
//! string off a UTF-8 boundary.

use std::ops::Range;

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `char_idx`th character. Indices past the end clamp
/// to `s.len()`.
pub fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

/// Convert a character range to a byte range, ordering and clamping the
/// ends so the result can always be used to slice `s`.
pub fn char_range_to_bytes(s: &str, chars: Range<usize>) -> Range<usize> {
    let (lo, hi) = if chars.start <= chars.end {
        (chars.start, chars.end)
    } else {
        (chars.end, chars.start)
    };
    byte_offset(s, lo)..byte_offset(s, hi)
}

/// Safe slice by character range.
pub fn slice_chars(s: &str, chars: Range<usize>) -> &str {
    &s[char_range_to_bytes(s, chars)]
}
