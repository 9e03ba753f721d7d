//! Classification of a diff into a single edit operation.

use serde::{Deserialize, Serialize};

use super::bound::{Bound, find_bound};
use super::chunk::{DiffChunk, compute_chunks};
use crate::text::{MarkedText, char_len};

/// The single edit turning an old text into a new one.
///
/// Positions are character offsets in the **old** text: operations are
/// applied to the text they were computed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DiffOperation {
    /// Insert `text` at `position`.
    Add { position: usize, text: String },
    /// Delete `count` characters starting at `position`.
    Remove { position: usize, count: usize },
    /// Replace `remove_count` characters at `position` with `insert_text`.
    Modify {
        position: usize,
        insert_text: String,
        remove_count: usize,
    },
    /// No text change; move the caret only.
    Cursor { position: usize },
    /// No change of any kind.
    None,
}

impl DiffOperation {
    /// Whether applying this operation changes the text.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            DiffOperation::Add { .. } | DiffOperation::Remove { .. } | DiffOperation::Modify { .. }
        )
    }

    /// Position the operation targets, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            DiffOperation::Add { position, .. }
            | DiffOperation::Remove { position, .. }
            | DiffOperation::Modify { position, .. }
            | DiffOperation::Cursor { position } => Some(*position),
            DiffOperation::None => None,
        }
    }

    /// Translate the operation by `delta` characters.
    ///
    /// Used to lift an operation computed over an editable region into
    /// document coordinates.
    pub fn offset_by(self, delta: usize) -> Self {
        match self {
            DiffOperation::Add { position, text } => DiffOperation::Add {
                position: position.saturating_add(delta),
                text,
            },
            DiffOperation::Remove { position, count } => DiffOperation::Remove {
                position: position.saturating_add(delta),
                count,
            },
            DiffOperation::Modify {
                position,
                insert_text,
                remove_count,
            } => DiffOperation::Modify {
                position: position.saturating_add(delta),
                insert_text,
                remove_count,
            },
            DiffOperation::Cursor { position } => DiffOperation::Cursor {
                position: position.saturating_add(delta),
            },
            DiffOperation::None => DiffOperation::None,
        }
    }
}

/// A marker-annotated before/after pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffText {
    pub old_text: String,
    pub new_text: String,
}

impl DiffText {
    pub fn new(old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
        }
    }
}

/// Cursor-only move when the texts are identical and the caret moved.
fn cursor_or_none(old: &MarkedText, new: &MarkedText) -> DiffOperation {
    if old.text != new.text || old.cursor == new.cursor {
        return DiffOperation::None;
    }
    // A marker that disappeared gives no destination for the caret
    match new.cursor {
        Some(position) => DiffOperation::Cursor { position },
        None => DiffOperation::None,
    }
}

/// Classify the bound of a chunk sequence into an operation.
pub fn classify(
    bound: Option<&Bound>,
    chunks: &[DiffChunk],
    old: &MarkedText,
    new: &MarkedText,
) -> DiffOperation {
    let Some(bound) = bound else {
        return cursor_or_none(old, new);
    };

    let span = bound.span_texts(chunks);
    if !span.changed {
        return cursor_or_none(old, new);
    }

    match (span.added.is_empty(), span.removed.is_empty()) {
        (false, true) => DiffOperation::Add {
            position: bound.old_start,
            text: span.added,
        },
        (true, false) => DiffOperation::Remove {
            position: bound.old_start,
            count: char_len(&span.removed),
        },
        (false, false) => DiffOperation::Modify {
            position: bound.old_start,
            remove_count: char_len(&span.removed),
            insert_text: span.added,
        },
        (true, true) => cursor_or_none(old, new),
    }
}

/// Compute the single operation turning `old_text` into `new_text`.
///
/// Both sides may carry one cursor marker; markers are stripped before
/// diffing and only decide between `Cursor` and `None` when the stripped
/// texts are identical.
pub fn extract_operation(diff_text: &DiffText) -> DiffOperation {
    let old = MarkedText::parse(&diff_text.old_text);
    let new = MarkedText::parse(&diff_text.new_text);

    // Fast path: identical texts need no diff
    if old.text == new.text {
        return cursor_or_none(&old, &new);
    }

    let chunks = compute_chunks(&old.text, &new.text);
    let bound = find_bound(&chunks);
    classify(bound.as_ref(), &chunks, &old, &new)
}
