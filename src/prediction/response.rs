//! Parsing and cleaning of backend completion payloads.
//!
//! A completion text may look like:
//!
//! ```text
//! <|INTENT|> rename the helper <|EDIT_START|>
//! fn helper_v2<|user_cursor_is_here|>() {}
//! <|EDIT_END|>
//! ```
//!
//! The intent block is optional, the edit markers are optional in
//! practice, and the cursor marker is preserved verbatim.

use serde_json::Value;

use crate::error::{PredictionError, PredictionResult};

pub const INTENT_MARKER: &str = "<|INTENT|>";
pub const EDIT_START_MARKER: &str = "<|EDIT_START|>";
pub const EDIT_END_MARKER: &str = "<|EDIT_END|>";

/// JSON pointer of the completion text inside a response body.
const COMPLETION_TEXT_POINTER: &str = "/output/content/0/text";

/// Extract the completion text from a response body.
///
/// A body without `output.content[0].text` violates the backend contract
/// and is reported as [`PredictionError::MalformedResponse`].
pub fn parse_completion_body(body: &Value) -> PredictionResult<String> {
    body.pointer(COMPLETION_TEXT_POINTER)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PredictionError::malformed("missing string at output.content[0].text"))
}

/// Split a leading `<|INTENT|> ... <|EDIT_START|>` block off `raw`.
///
/// Returns the trimmed intent (if non-empty) and the remaining payload,
/// which still starts with the edit-start marker. Text without a complete
/// intent block is returned unchanged.
pub fn extract_intent(raw: &str) -> (Option<String>, String) {
    let Some(rest) = raw.trim_start().strip_prefix(INTENT_MARKER) else {
        return (None, raw.to_string());
    };
    let Some(end) = rest.find(EDIT_START_MARKER) else {
        return (None, raw.to_string());
    };

    let intent = rest[..end].trim();
    let intent = (!intent.is_empty()).then(|| intent.to_string());
    (intent, rest[end..].to_string())
}

/// Remove edit markers from a completion text.
///
/// Every start/end marker is dropped together with one newline directly
/// following it; the contents of multiple marker pairs are concatenated
/// with the text around them. Whitespace around the result is trimmed.
/// Cleaning is idempotent.
///
/// ```
/// use ghost_edit::prediction::clean_prediction;
///
/// assert_eq!(clean_prediction("<|EDIT_START|>x<|EDIT_END|>"), "x");
/// assert_eq!(
///     clean_prediction("<|EDIT_START|>first<|EDIT_END|> middle <|EDIT_START|>second<|EDIT_END|>"),
///     "first middle second"
/// );
/// ```
pub fn clean_prediction(raw: &str) -> String {
    const MARKERS: [&str; 3] = [EDIT_START_MARKER, EDIT_END_MARKER, INTENT_MARKER];

    let mut cleaned = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some((idx, marker)) = MARKERS
        .iter()
        .filter_map(|marker| rest.find(marker).map(|idx| (idx, *marker)))
        .min_by_key(|(idx, _)| *idx)
    {
        cleaned.push_str(&rest[..idx]);
        rest = &rest[idx + marker.len()..];
        rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }
    cleaned.push_str(rest);

    cleaned.trim().to_string()
}
