//! Caret and selection bookkeeping for a controlled single-line field.
//!
//! `TextField` never owns the text. Every operation takes the value the
//! field currently displays and either moves the caret or proposes a
//! `FieldEdit` (the next value plus where the caret should land). The host
//! forwards the proposal to whoever owns the value; if the next committed
//! value matches the proposal the predicted caret is adopted.
//!
//! Invariants:
//! * `caret` and `anchor` are byte offsets on grapheme boundaries of the
//!   value they were last clamped against.
//! * A selection exists only when `anchor` is set and differs from `caret`.

use crate::grapheme;
use crate::segment::normalize;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub value: String,
    pub caret: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextField {
    caret: usize,
    anchor: Option<usize>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field with the caret parked after the last cluster of `value`.
    pub fn at_end(value: &str) -> Self {
        Self {
            caret: value.len(),
            anchor: None,
        }
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Non-empty selected byte range, if any.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        if anchor == self.caret {
            return None;
        }
        Some(anchor.min(self.caret)..anchor.max(self.caret))
    }

    pub fn select_all(&mut self, value: &str) {
        self.anchor = Some(0);
        self.caret = value.len();
    }

    pub fn collapse(&mut self) {
        self.anchor = None;
    }

    /// Re-validate against a value that may have changed underneath us.
    pub fn clamp(&mut self, value: &str) {
        self.caret = snap(value, self.caret);
        self.anchor = self.anchor.map(|a| snap(value, a));
    }

    pub fn apply(&mut self, edit: &FieldEdit) {
        self.caret = edit.caret;
        self.anchor = None;
    }

    pub fn move_left(&mut self, value: &str) {
        match self.selection() {
            Some(range) => self.caret = range.start,
            None => self.caret = grapheme::prev_boundary(value, self.caret),
        }
        self.anchor = None;
    }

    pub fn move_right(&mut self, value: &str) {
        match self.selection() {
            Some(range) => self.caret = range.end,
            None => self.caret = grapheme::next_boundary(value, self.caret),
        }
        self.anchor = None;
    }

    pub fn move_home(&mut self) {
        self.caret = 0;
        self.anchor = None;
    }

    pub fn move_end(&mut self, value: &str) {
        self.caret = value.len();
        self.anchor = None;
    }

    /// Insert `text` at the caret, replacing the selection when present.
    pub fn insert(&self, value: &str, text: &str) -> FieldEdit {
        let text = normalize(text);
        let range = self.selection().unwrap_or(self.caret..self.caret);
        let mut next = String::with_capacity(value.len() + text.len());
        next.push_str(&value[..range.start]);
        next.push_str(&text);
        next.push_str(&value[range.end..]);
        FieldEdit {
            value: next,
            caret: range.start + text.len(),
        }
    }

    /// Backspace: remove the selection or the cluster before the caret.
    /// `None` when nothing would change.
    pub fn delete_backward(&self, value: &str) -> Option<FieldEdit> {
        let range = match self.selection() {
            Some(range) => range,
            None if self.caret == 0 => return None,
            None => grapheme::prev_boundary(value, self.caret)..self.caret,
        };
        Some(remove(value, range))
    }

    /// Delete: remove the selection or the cluster after the caret.
    pub fn delete_forward(&self, value: &str) -> Option<FieldEdit> {
        let range = match self.selection() {
            Some(range) => range,
            None if self.caret >= value.len() => return None,
            None => self.caret..grapheme::next_boundary(value, self.caret),
        };
        Some(remove(value, range))
    }
}

fn remove(value: &str, range: Range<usize>) -> FieldEdit {
    let mut next = String::with_capacity(value.len());
    next.push_str(&value[..range.start]);
    next.push_str(&value[range.end..]);
    FieldEdit {
        value: next,
        caret: range.start,
    }
}

fn snap(value: &str, byte: usize) -> usize {
    let byte = byte.min(value.len());
    if grapheme::is_boundary(value, byte) {
        byte
    } else {
        grapheme::prev_boundary(value, byte)
    }
}
