//! Character offset helpers.
//!
//! Operations address text by character (Unicode scalar value) offsets.
//! Rust strings are sliced by byte, so every splice goes through
//! `char_to_byte` first.

/// Number of characters in `text`.
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a character offset into a byte offset, clamped to `text.len()`.
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(text.len())
}

/// Character range `[from, to)` covering the line containing `char_offset`
/// plus up to `before` lines above and `after` lines below.
///
/// The range never includes the newline terminating its last line, so the
/// region can be rewritten without touching the following line break.
pub fn line_window(text: &str, char_offset: usize, before: usize, after: usize) -> (usize, usize) {
    let mut line_starts = vec![0usize];
    let mut total = 0usize;
    for (idx, ch) in text.chars().enumerate() {
        total = idx + 1;
        if ch == '\n' {
            line_starts.push(idx + 1);
        }
    }

    let offset = char_offset.min(total);
    let cursor_line = line_starts
        .partition_point(|&start| start <= offset)
        .saturating_sub(1);

    let first_line = cursor_line.saturating_sub(before);
    let last_line = (cursor_line + after).min(line_starts.len() - 1);

    let from = line_starts[first_line];
    let to = match line_starts.get(last_line + 1) {
        // Exclude the newline of the last line in the window
        Some(next_start) => next_start - 1,
        None => total,
    };
    (from, to)
}
