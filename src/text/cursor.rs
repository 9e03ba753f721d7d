//! Cursor marker protocol.
//!
//! The caret position travels inside plain text as a reserved marker string.
//! Before diffing, the marker is stripped and its offset remembered so that
//! the marker itself never shows up as an inserted or removed region.

use super::offset::{char_len, char_to_byte};

/// Reserved marker standing in for the caret inside annotated text.
///
/// The token shape matches the `<|...|>` control tokens used by the
/// prediction backend and does not occur in ordinary source text.
pub const CURSOR_MARKER: &str = "<|user_cursor_is_here|>";

/// Remove every cursor marker from `text`.
///
/// Returns the clean text and the character offset of the first marker
/// occurrence, or `None` when the text carries no marker.
///
/// # Example
///
/// ```
/// use ghost_edit::text::{CURSOR_MARKER, strip_cursor_marker};
///
/// let annotated = format!("let x{CURSOR_MARKER} = 1;");
/// let (clean, offset) = strip_cursor_marker(&annotated);
/// assert_eq!(clean, "let x = 1;");
/// assert_eq!(offset, Some(5));
/// ```
pub fn strip_cursor_marker(text: &str) -> (String, Option<usize>) {
    let Some(byte_idx) = text.find(CURSOR_MARKER) else {
        return (text.to_string(), None);
    };

    let offset = char_len(&text[..byte_idx]);
    (text.replace(CURSOR_MARKER, ""), Some(offset))
}

/// Marker-stripped text together with the caret offset it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedText {
    pub text: String,
    pub cursor: Option<usize>,
}

impl MarkedText {
    /// Strip the cursor marker from annotated text.
    pub fn parse(annotated: &str) -> Self {
        let (text, cursor) = strip_cursor_marker(annotated);
        Self { text, cursor }
    }
}

/// Insert the cursor marker at `char_offset` (clamped to the text length).
pub fn insert_cursor_marker(text: &str, char_offset: usize) -> String {
    let byte_idx = char_to_byte(text, char_offset);
    let mut annotated = String::with_capacity(text.len() + CURSOR_MARKER.len());
    annotated.push_str(&text[..byte_idx]);
    annotated.push_str(CURSOR_MARKER);
    annotated.push_str(&text[byte_idx..]);
    annotated
}
