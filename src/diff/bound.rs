//! Collapse a chunk sequence into one contiguous changed span.
//!
//! All added/removed chunks of the comparison are merged into a single
//! bound, wherever the cursor is. A prediction that touches two disjoint
//! regions therefore yields one `Modify` covering both, with the unchanged
//! text between them re-inserted verbatim.

use super::chunk::{ChunkKind, DiffChunk};

/// Index range over a chunk sequence containing every changed chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bound {
    /// Index of the first added/removed chunk.
    pub start_idx: usize,
    /// Index of the last added/removed chunk (inclusive).
    pub end_idx: usize,
    /// Character offset in the old text where the span begins.
    pub old_start: usize,
    /// Character offset in the new text where the span begins.
    pub new_start: usize,
}

/// Old-side and new-side text covered by a bound.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanText {
    /// Text the span occupies in the old document.
    pub removed: String,
    /// Text the span occupies in the new document.
    pub added: String,
    /// Whether any chunk inside the span is added or removed.
    pub changed: bool,
}

/// Find the bound covering every changed chunk.
///
/// Returns `None` when no chunk is added or removed.
pub fn find_bound(chunks: &[DiffChunk]) -> Option<Bound> {
    let mut first: Option<usize> = None;
    let mut last: Option<usize> = None;
    let mut old_start = 0;
    let mut new_start = 0;

    for (idx, chunk) in chunks.iter().enumerate() {
        if chunk.kind.is_change() {
            first.get_or_insert(idx);
            last = Some(idx);
        } else if first.is_none() {
            old_start += chunk.old_len();
            new_start += chunk.new_len();
        }
    }

    Some(Bound {
        start_idx: first?,
        end_idx: last?,
        old_start,
        new_start,
    })
}

impl Bound {
    /// Accumulate the old-side and new-side text of the bound's chunks.
    ///
    /// Unchanged chunks inside the span belong to both sides, so replacing
    /// `removed` with `added` at `old_start` turns the old text into the new.
    pub fn span_texts(&self, chunks: &[DiffChunk]) -> SpanText {
        let mut span = SpanText::default();
        let end = self.end_idx.min(chunks.len().saturating_sub(1));
        let Some(range) = chunks.get(self.start_idx..=end) else {
            return span;
        };

        for chunk in range {
            match chunk.kind {
                ChunkKind::Unchanged => {
                    span.removed.push_str(&chunk.value);
                    span.added.push_str(&chunk.value);
                }
                ChunkKind::Removed => {
                    span.removed.push_str(&chunk.value);
                    span.changed = true;
                }
                ChunkKind::Added => {
                    span.added.push_str(&chunk.value);
                    span.changed = true;
                }
            }
        }
        span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unchanged(value: &str) -> DiffChunk {
        DiffChunk::new(ChunkKind::Unchanged, value)
    }

    fn added(value: &str) -> DiffChunk {
        DiffChunk::new(ChunkKind::Added, value)
    }

    fn removed(value: &str) -> DiffChunk {
        DiffChunk::new(ChunkKind::Removed, value)
    }

    #[test]
    fn no_changes_yields_no_bound() {
        assert_eq!(find_bound(&[]), None);
        assert_eq!(find_bound(&[unchanged("abc")]), None);
    }

    #[test]
    fn single_insertion_offsets() {
        let chunks = vec![unchanged("def hello"), added("_world"), unchanged("():")];
        let bound = find_bound(&chunks).unwrap();
        assert_eq!(
            bound,
            Bound {
                start_idx: 1,
                end_idx: 1,
                old_start: 9,
                new_start: 9,
            }
        );

        let span = bound.span_texts(&chunks);
        assert_eq!(span.added, "_world");
        assert_eq!(span.removed, "");
        assert!(span.changed);
    }

    #[test]
    fn disjoint_changes_are_merged_into_one_span() {
        let chunks = vec![
            unchanged("a "),
            removed("b"),
            added("x"),
            unchanged(" c "),
            removed("d"),
            added("y"),
            unchanged(" e"),
        ];
        let bound = find_bound(&chunks).unwrap();
        assert_eq!(bound.start_idx, 1);
        assert_eq!(bound.end_idx, 5);
        assert_eq!(bound.old_start, 2);
        assert_eq!(bound.new_start, 2);

        let span = bound.span_texts(&chunks);
        assert_eq!(span.removed, "b c d");
        assert_eq!(span.added, "x c y");
    }

    #[test]
    fn offsets_count_characters() {
        let chunks = vec![unchanged("日本"), removed("語")];
        let bound = find_bound(&chunks).unwrap();
        assert_eq!(bound.old_start, 2);
        assert_eq!(bound.new_start, 2);
    }

    #[test]
    fn span_over_unchanged_chunks_reports_no_change() {
        let chunks = vec![unchanged("a"), unchanged("b")];
        let bound = Bound {
            start_idx: 0,
            end_idx: 1,
            old_start: 0,
            new_start: 0,
        };
        let span = bound.span_texts(&chunks);
        assert!(!span.changed);
        assert_eq!(span.added, span.removed);
    }
}
