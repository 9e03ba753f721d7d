//! Application of classified operations.
//!
//! Two forms share the same offsets:
//! - [`apply_operation`] rewrites a plain string
//! - [`apply_to_document`] produces a [`TextChange`] plus the resulting
//!   selection, for callers that own a live buffer
//!
//! Positions past the end of the text are clamped; applying never panics.

use serde::{Deserialize, Serialize};

use super::operation::DiffOperation;
use crate::text::{Selection, char_len, char_to_byte, strip_cursor_marker};

/// Replace the character range `[from, to)` with `insert`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChange {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl TextChange {
    /// Apply the change to `text` in place.
    pub fn apply_to(&self, text: &mut String) {
        let start = char_to_byte(text, self.from);
        let end = char_to_byte(text, self.to.max(self.from));
        text.replace_range(start..end, &self.insert);
    }
}

/// Outcome of applying an operation to a document and its selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedEdit {
    /// The single change to perform, if the operation edits text.
    pub change: Option<TextChange>,
    /// Selection after the change.
    pub selection: Selection,
}

impl AppliedEdit {
    /// Apply the change (if any) to `text` and return the new selection.
    pub fn apply_to(&self, text: &mut String) -> Selection {
        if let Some(change) = &self.change {
            change.apply_to(text);
        }
        self.selection
    }
}

impl DiffOperation {
    /// The document change this operation performs, if any.
    pub fn to_change(&self) -> Option<TextChange> {
        match self {
            DiffOperation::Add { position, text } => Some(TextChange {
                from: *position,
                to: *position,
                insert: text.clone(),
            }),
            DiffOperation::Remove { position, count } => Some(TextChange {
                from: *position,
                to: position.saturating_add(*count),
                insert: String::new(),
            }),
            DiffOperation::Modify {
                position,
                insert_text,
                remove_count,
            } => Some(TextChange {
                from: *position,
                to: position.saturating_add(*remove_count),
                insert: insert_text.clone(),
            }),
            DiffOperation::Cursor { .. } | DiffOperation::None => None,
        }
    }
}

/// Apply `operation` to `text`, returning the rewritten text.
///
/// `Cursor` and `None` return the text unchanged.
pub fn apply_operation(text: &str, operation: &DiffOperation) -> String {
    let mut result = text.to_string();
    if let Some(change) = operation.to_change() {
        change.apply_to(&mut result);
    }
    result
}

/// Apply `operation` to a document whose current selection is `current`.
///
/// Edits place the caret right after the inserted text (at `position` for
/// a removal). A cursor move emits no change. `None` keeps the current
/// selection unless `desired_cursor` asks for a specific caret position.
pub fn apply_to_document(
    operation: &DiffOperation,
    current: Selection,
    desired_cursor: Option<usize>,
) -> AppliedEdit {
    match operation {
        DiffOperation::Add { position, text } => AppliedEdit {
            change: operation.to_change(),
            selection: Selection::cursor(position.saturating_add(char_len(text))),
        },
        DiffOperation::Remove { position, .. } => AppliedEdit {
            change: operation.to_change(),
            selection: Selection::cursor(*position),
        },
        DiffOperation::Modify {
            position,
            insert_text,
            ..
        } => AppliedEdit {
            change: operation.to_change(),
            selection: Selection::cursor(position.saturating_add(char_len(insert_text))),
        },
        DiffOperation::Cursor { position } => AppliedEdit {
            change: None,
            selection: Selection::cursor(*position),
        },
        DiffOperation::None => AppliedEdit {
            change: None,
            selection: desired_cursor.map(Selection::cursor).unwrap_or(current),
        },
    }
}

/// Fallback for callers holding only a raw replacement string.
///
/// Replaces the whole document with the marker-stripped replacement and
/// places the caret at its end.
pub fn replace_document(document: &str, replacement: &str) -> AppliedEdit {
    let (clean, _) = strip_cursor_marker(replacement);
    let end = char_len(&clean);
    AppliedEdit {
        change: Some(TextChange {
            from: 0,
            to: char_len(document),
            insert: clean,
        }),
        selection: Selection::cursor(end),
    }
}
