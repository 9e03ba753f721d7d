//! Chunk-level text diff with word/character granularity selection.

use similar::{ChangeTag, TextDiff};

use crate::text::char_len;

/// Which side(s) of the comparison a chunk belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkKind {
    Added,
    Removed,
    Unchanged,
}

impl ChunkKind {
    /// True for `Added` and `Removed`.
    pub fn is_change(self) -> bool {
        !matches!(self, ChunkKind::Unchanged)
    }
}

impl From<ChangeTag> for ChunkKind {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Equal => ChunkKind::Unchanged,
            ChangeTag::Delete => ChunkKind::Removed,
            ChangeTag::Insert => ChunkKind::Added,
        }
    }
}

/// A maximal run of consecutive diff tokens sharing the same kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffChunk {
    pub kind: ChunkKind,
    pub value: String,
}

impl DiffChunk {
    pub fn new(kind: ChunkKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn char_len(&self) -> usize {
        char_len(&self.value)
    }

    /// Characters this chunk occupies in the old text.
    pub fn old_len(&self) -> usize {
        match self.kind {
            ChunkKind::Added => 0,
            ChunkKind::Removed | ChunkKind::Unchanged => self.char_len(),
        }
    }

    /// Characters this chunk occupies in the new text.
    pub fn new_len(&self) -> usize {
        match self.kind {
            ChunkKind::Removed => 0,
            ChunkKind::Added | ChunkKind::Unchanged => self.char_len(),
        }
    }
}

/// Tokenization used for a diff pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    /// Words and whitespace runs are the diff tokens.
    Word,
    /// Every character is a diff token.
    Char,
}

/// Diff two marker-stripped strings at the given granularity.
///
/// Concatenating the `Unchanged` and `Removed` chunks reproduces `old`;
/// concatenating the `Unchanged` and `Added` chunks reproduces `new`.
pub fn diff_with(old: &str, new: &str, granularity: Granularity) -> Vec<DiffChunk> {
    let diff = match granularity {
        Granularity::Word => TextDiff::from_words(old, new),
        Granularity::Char => TextDiff::from_chars(old, new),
    };

    let mut chunks: Vec<DiffChunk> = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = ChunkKind::from(change.tag());
        match chunks.last_mut() {
            Some(last) if last.kind == kind => last.value.push_str(change.value()),
            _ => chunks.push(DiffChunk::new(kind, change.value())),
        }
    }
    chunks
}

/// Pick the granularity for the final diff from a word-level first pass.
///
/// Character granularity is used only when the word diff looks like a
/// single-token rename: at most two changed chunks, none of which contains
/// a space or newline once trimmed.
pub fn select_granularity(word_chunks: &[DiffChunk]) -> Granularity {
    let changed: Vec<&DiffChunk> = word_chunks
        .iter()
        .filter(|chunk| chunk.kind.is_change())
        .collect();

    let token_shaped = changed.iter().all(|chunk| {
        let trimmed = chunk.value.trim();
        !trimmed.contains(' ') && !trimmed.contains('\n')
    });

    if !changed.is_empty() && changed.len() <= 2 && token_shaped {
        Granularity::Char
    } else {
        Granularity::Word
    }
}

/// Compute the chunk sequence between two marker-stripped strings.
///
/// Word diffs are noisy for sub-word edits (`hello` → `hello_world`), so
/// small token-shaped edits are recomputed at character granularity.
pub fn compute_chunks(old: &str, new: &str) -> Vec<DiffChunk> {
    let word_chunks = diff_with(old, new, Granularity::Word);
    match select_granularity(&word_chunks) {
        Granularity::Word => word_chunks,
        Granularity::Char => diff_with(old, new, Granularity::Char),
    }
}
