//! Style layer.
//!
//! Painting produces plain line text plus a `StyleLayer` of column spans, so
//! emission can map semantic attributes (focus, selection, disabled) onto
//! terminal attributes in one place.
//!
//! Design invariants:
//! * A `StyleSpan` never splits a grapheme cluster; spans are computed from
//!   the same width engine (`core_text::egc_width`) used to lay out the line.
//! * Spans are line-local (identified by `line`). Horizontal ranges use
//!   half-open `[start_col, end_col)` semantics in visual columns.
//! * Spans on one line never overlap: a disabled element cannot hold focus,
//!   and the caret / selection are only painted inside a focused input.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleAttr {
    /// Software caret inside a focused input.
    Cursor,
    /// Selected text inside a focused input.
    Selection,
    /// Focused button.
    Focused,
    /// Emphasized info text.
    Emphasis,
    Disabled,
    /// Button waiting on an operation in flight.
    Busy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleSpan {
    pub line: usize,
    pub start_col: u16, // inclusive
    pub end_col: u16,   // exclusive
    pub attr: StyleAttr,
}

impl StyleSpan {
    pub fn width(&self) -> u16 {
        self.end_col.saturating_sub(self.start_col)
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct StyleLayer {
    pub spans: Vec<StyleSpan>,
}

impl StyleLayer {
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    pub fn push(&mut self, span: StyleSpan) {
        if span.width() > 0 {
            self.spans.push(span);
        }
    }

    /// Spans on `line`, ordered by start column.
    pub fn line_spans(&self, line: usize) -> Vec<&StyleSpan> {
        let mut out: Vec<&StyleSpan> = self.spans.iter().filter(|s| s.line == line).collect();
        out.sort_by_key(|s| s.start_col);
        out
    }

    pub fn find(&self, attr: StyleAttr) -> Option<&StyleSpan> {
        self.spans.iter().find(|s| s.attr == attr)
    }
}
