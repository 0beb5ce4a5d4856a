//! Lay the committed view out as terminal text.
//!
//! The panel is a single row: children in tree order separated by one
//! space. Inputs paint as a bracketed field at least `MIN_FIELD_COLS` wide;
//! buttons paint as `[ caption ]`, with a trailing ellipsis while busy. The
//! row is clipped to the available width on a grapheme boundary.

use crate::document::Document;
use crate::style::{StyleAttr, StyleLayer, StyleSpan};
use crate::view::{Element, ElementKind};
use core_text::{grapheme, str_width};
use std::borrow::Cow;

pub const MIN_FIELD_COLS: usize = 16;
const BUSY_SUFFIX: &str = " …";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<String>,
    pub styles: StyleLayer,
}

impl Frame {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

struct LineBuilder {
    line: usize,
    text: String,
    col: u16,
    styles: StyleLayer,
}

impl LineBuilder {
    fn new(line: usize) -> Self {
        Self {
            line,
            text: String::new(),
            col: 0,
            styles: StyleLayer::new(),
        }
    }

    fn push(&mut self, s: &str, attr: Option<StyleAttr>) -> u16 {
        let start = self.col;
        self.text.push_str(s);
        self.col = self.col.saturating_add(cols(str_width(s)));
        if let Some(attr) = attr {
            self.span(start, self.col, attr);
        }
        start
    }

    fn span(&mut self, start_col: u16, end_col: u16, attr: StyleAttr) {
        self.styles.push(StyleSpan {
            line: self.line,
            start_col,
            end_col,
            attr,
        });
    }
}

/// Paint the document's committed view into a frame no wider than `width`.
pub fn paint(doc: &Document, width: u16) -> Frame {
    let Some(view) = doc.view() else {
        return Frame::default();
    };
    let mut b = LineBuilder::new(0);
    for (idx, el) in view.children.iter().enumerate() {
        if idx > 0 {
            b.push(" ", None);
        }
        let focused = el.slot.is_some() && el.slot == doc.focused();
        match el.kind {
            ElementKind::Info => {
                b.push(&printable(&el.text), Some(StyleAttr::Emphasis));
            }
            ElementKind::Label => {
                b.push(&printable(&el.text), None);
            }
            ElementKind::TextInput => paint_input(&mut b, doc, el, focused),
            ElementKind::Button(_) => paint_button(&mut b, el, focused),
        }
    }
    clip(b, width)
}

fn paint_input(b: &mut LineBuilder, doc: &Document, el: &Element, focused: bool) {
    let value = printable(&el.text);
    let value = value.as_ref();
    let inner = (str_width(value) + 1).max(MIN_FIELD_COLS);
    let pad = inner - str_width(value);
    let open = b.push("[", None);
    let value_start = open.saturating_add(1);
    b.push(value, None);
    b.push(&" ".repeat(pad), None);
    let close = b.push("]", None);
    if el.disabled {
        b.span(open, close.saturating_add(1), StyleAttr::Disabled);
        return;
    }
    if !focused {
        return;
    }
    let Some(field) = el.slot.and_then(|slot| doc.field(slot)) else {
        return;
    };
    match field.selection() {
        Some(range) => {
            let start = value_start.saturating_add(cols(grapheme::visual_col(value, range.start)));
            let end = value_start.saturating_add(cols(grapheme::visual_col(value, range.end)));
            b.span(start, end, StyleAttr::Selection);
        }
        None => {
            let caret = field.caret().min(value.len());
            let col = value_start.saturating_add(cols(grapheme::visual_col(value, caret)));
            let next = grapheme::next_boundary(value, caret);
            let w = if next > caret {
                grapheme::cluster_width(&value[caret..next]).max(1)
            } else {
                1
            };
            b.span(col, col.saturating_add(cols(w)), StyleAttr::Cursor);
        }
    }
}

fn paint_button(b: &mut LineBuilder, el: &Element, focused: bool) {
    let mut caption = format!("[ {}", printable(&el.text));
    if el.busy {
        caption.push_str(BUSY_SUFFIX);
    }
    caption.push_str(" ]");
    let attr = if el.disabled && !el.busy {
        Some(StyleAttr::Disabled)
    } else if el.busy {
        Some(StyleAttr::Busy)
    } else if focused {
        Some(StyleAttr::Focused)
    } else {
        None
    };
    b.push(&caption, attr);
}

/// Column count clamped to the terminal coordinate range.
fn cols(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Control characters would drive the terminal instead of printing; each is
/// replaced by one `?` per UTF-8 byte so caret byte offsets stay valid.
fn printable(s: &str) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_control() {
            out.extend(std::iter::repeat_n('?', c.len_utf8()));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn clip(b: LineBuilder, width: u16) -> Frame {
    let mut text = String::new();
    let mut col: u16 = 0;
    for g in grapheme::iter(&b.text) {
        let w = cols(grapheme::cluster_width(g));
        if col.saturating_add(w) > width {
            break;
        }
        text.push_str(g);
        col = col.saturating_add(w);
    }
    let mut styles = StyleLayer::new();
    for span in b.styles.spans {
        if span.start_col >= col {
            continue;
        }
        styles.push(StyleSpan {
            end_col: span.end_col.min(col),
            ..span
        });
    }
    Frame {
        lines: vec![text],
        styles,
    }
}
