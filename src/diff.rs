//! Cursor-aware edit extraction.
//!
//! Turns a `(before, after)` text pair into the single smallest
//! [`DiffOperation`] that rewrites one into the other, and applies such
//! operations back to text or to a document selection.
//!
//! ```text
//! DiffText (marker-annotated)
//!       │  strip_cursor_marker
//!       ▼
//! compute_chunks ──► find_bound ──► classify ──► DiffOperation
//!                                                   │
//!                        apply_operation / apply_to_document
//! ```

pub mod apply;
pub mod bound;
pub mod chunk;
pub mod operation;

pub use apply::{AppliedEdit, TextChange, apply_operation, apply_to_document, replace_document};
pub use bound::{Bound, SpanText, find_bound};
pub use chunk::{ChunkKind, DiffChunk, Granularity, compute_chunks, diff_with};
pub use operation::{DiffOperation, DiffText, classify, extract_operation};
