//! Grapheme-aware text primitives for single-line fields.
//!
//! The panel's title input is a controlled field: its value is owned by the
//! parent application and only echoed back through renders. This crate holds
//! the editing arithmetic the rendering layer needs to turn a keystroke into
//! the next proposed value (caret, selection, grapheme boundaries, width)
//! without ever storing the value itself.

pub mod field;
pub mod segment;
pub mod width;

pub use field::{FieldEdit, TextField};
pub use width::{egc_width, str_width};

pub mod grapheme {
    use crate::egc_width;
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in a line.
    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    /// Previous grapheme boundary (returns 0 if already at or below 1st boundary).
    pub fn prev_boundary(line: &str, byte: usize) -> usize {
        if byte == 0 || byte > line.len() {
            return 0;
        }
        let mut last = 0;
        for (idx, _) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Next grapheme boundary (returns line.len() if at or beyond end).
    pub fn next_boundary(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        for (idx, _) in line.grapheme_indices(true) {
            if idx > byte {
                return idx;
            }
        }
        line.len()
    }

    /// True when `byte` sits on a grapheme boundary (ends included).
    pub fn is_boundary(line: &str, byte: usize) -> bool {
        byte == 0
            || byte == line.len()
            || line.grapheme_indices(true).any(|(idx, _)| idx == byte)
    }

    /// Compute visual column (terminal cells) up to (but not including) byte offset.
    pub fn visual_col(line: &str, byte: usize) -> usize {
        let mut col = 0;
        for (idx, g) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            col += egc_width(g) as usize;
        }
        col
    }

    /// Width in terminal cells of this grapheme cluster.
    pub fn cluster_width(g: &str) -> usize {
        egc_width(g) as usize
    }

    /// Number of grapheme clusters (used for redacted length logging).
    pub fn count(line: &str) -> usize {
        line.graphemes(true).count()
    }
}
