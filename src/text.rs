//! Text manipulation utilities.
//!
//! This module provides utilities for working with plain text content:
//! - The cursor marker protocol used to annotate caret positions
//! - Conversion between character offsets and byte offsets
//! - Caret/selection ranges expressed in character offsets

pub mod cursor;
pub mod offset;
pub mod selection;

pub use cursor::{CURSOR_MARKER, MarkedText, insert_cursor_marker, strip_cursor_marker};
pub use offset::{char_len, char_to_byte, line_window};
pub use selection::Selection;
