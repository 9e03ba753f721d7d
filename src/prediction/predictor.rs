//! The predictor contract consumed by the cache and the coalescer.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::diff::{DiffOperation, DiffText, extract_operation};
use crate::error::PredictionResult;
use crate::text::{Selection, char_to_byte, insert_cursor_marker, line_window};

/// Snapshot of the editor a prediction is requested for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    /// Full document text.
    pub text: String,
    /// Current selection in character offsets.
    pub selection: Selection,
    /// Document version; a prediction is only applied to the version it
    /// was computed for.
    pub version: u64,
}

impl EditorState {
    pub fn new(text: impl Into<String>, selection: Selection, version: u64) -> Self {
        Self {
            text: text.into(),
            selection,
            version,
        }
    }
}

/// Raw prediction returned by a backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Original region text with the cursor marker at the selection start.
    pub old_text: String,
    /// The model's rewrite of the region, marker-annotated.
    pub new_text: String,
    /// Character offset of the region start in the document.
    pub from: usize,
    /// Character offset of the region end in the document.
    pub to: usize,
    /// Document version the prediction was computed against.
    pub version: u64,
    /// Human-readable rationale extracted from the response, if any.
    pub intent: Option<String>,
}

impl Prediction {
    pub fn diff_text(&self) -> DiffText {
        DiffText::new(self.old_text.clone(), self.new_text.clone())
    }

    /// Operation relative to the start of the predicted region.
    pub fn operation(&self) -> DiffOperation {
        extract_operation(&self.diff_text())
    }

    /// Operation in document coordinates.
    pub fn document_operation(&self) -> DiffOperation {
        self.operation().offset_by(self.from)
    }

    /// Whether this prediction belongs to the document version in `state`.
    pub fn is_current_for(&self, state: &EditorState) -> bool {
        self.version == state.version
    }
}

/// The editable region sent to the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRegion {
    pub from: usize,
    pub to: usize,
    /// Region text with the cursor marker inserted.
    pub text: String,
}

impl EditRegion {
    /// Lines around the selection start, `context_lines` above and below.
    pub fn around_cursor(state: &EditorState, context_lines: usize) -> Self {
        let cursor = state.selection.from();
        let (from, to) = line_window(&state.text, cursor, context_lines, context_lines);

        let start = char_to_byte(&state.text, from);
        let end = char_to_byte(&state.text, to);
        let region = &state.text[start..end];

        Self {
            from,
            to,
            text: insert_cursor_marker(region, cursor.saturating_sub(from)),
        }
    }
}

/// Produces a prediction for an editor state.
///
/// Implementations must observe `cancel`: once it fires they should stop
/// work and return [`PredictionError::Cancelled`](crate::error::PredictionError::Cancelled)
/// instead of a result.
pub trait Predictor: Send + Sync + 'static {
    fn predict(
        &self,
        state: &EditorState,
        cancel: &CancellationToken,
    ) -> impl Future<Output = PredictionResult<Prediction>> + Send;
}
