use serde::{Deserialize, Serialize};

/// A single selection range in character offsets.
///
/// `anchor` is where the selection started, `head` is where the caret sits.
/// A collapsed selection (`anchor == head`) is a plain caret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Collapsed selection at `position`.
    pub fn cursor(position: usize) -> Self {
        Self::new(position, position)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backwards_selection_orders_bounds() {
        let selection = Selection::new(10, 4);
        assert_eq!(selection.from(), 4);
        assert_eq!(selection.to(), 10);
        assert!(!selection.is_empty());
    }

    #[test]
    fn cursor_is_collapsed() {
        assert!(Selection::cursor(3).is_empty());
    }
}
