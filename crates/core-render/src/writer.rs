//! Terminal writer abstraction.
//!
//! A thin layer that batches primitive terminal operations for one frame and
//! flushes them in a single write.
//!
//! Design invariants:
//! * Commands preserve ordering; no flushing mid-frame.
//! * All positions are absolute (0,0) origin relative to the panel; caller ensures bounds.
//! * Every `Style` is closed by a `ResetStyle` before the next run is printed.
//! * Writer owns no global state; it is a short-lived object per frame.

use crate::paint::Frame;
use crate::style::StyleAttr;
use anyhow::Result;
use core_text::grapheme;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine(u16, u16),
    Style(StyleAttr),
    ResetStyle,
    Print(String),
}

#[derive(Default, Debug)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn clear_line(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::ClearLine(x, y));
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn print_styled<S: Into<String>>(&mut self, s: S, attr: StyleAttr) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        self.cmds.push(Command::Style(attr));
        self.cmds.push(Command::Print(s));
        self.cmds.push(Command::ResetStyle);
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    /// Translate a painted frame into commands, top row at `origin_y`.
    pub fn from_frame(frame: &Frame, origin_y: u16) -> Self {
        let mut w = Self::new();
        for (idx, line) in frame.lines.iter().enumerate() {
            let y = origin_y.saturating_add(idx as u16);
            w.move_to(0, y);
            w.clear_line(0, y);
            let spans = frame.styles.line_spans(idx);
            let mut run = String::new();
            let mut run_attr: Option<StyleAttr> = None;
            let mut col: u16 = 0;
            for g in grapheme::iter(line) {
                let attr = spans
                    .iter()
                    .find(|s| s.start_col <= col && col < s.end_col)
                    .map(|s| s.attr);
                if attr != run_attr {
                    w.emit_run(std::mem::take(&mut run), run_attr);
                    run_attr = attr;
                }
                run.push_str(g);
                col = col.saturating_add(grapheme::cluster_width(g) as u16);
            }
            w.emit_run(run, run_attr);
        }
        w
    }

    fn emit_run(&mut self, run: String, attr: Option<StyleAttr>) {
        match attr {
            Some(attr) => self.print_styled(run, attr),
            None => self.print(run),
        }
    }

    pub fn flush(self) -> Result<()> {
        let mut out = stdout();
        self.flush_to(&mut out)
    }

    pub fn flush_to<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => {
                    queue!(out, MoveTo(x, y))?;
                }
                Command::ClearLine(_, _) => {
                    // Caller guarantees a preceding MoveTo(0, y) so CurrentLine wipes leftovers
                    // from a longer previous frame.
                    queue!(out, Clear(ClearType::CurrentLine))?;
                }
                Command::Style(attr) => {
                    queue!(out, SetAttribute(attribute_for(attr)))?;
                }
                Command::ResetStyle => {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                }
                Command::Print(s) => {
                    queue!(out, Print(s))?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn attribute_for(attr: StyleAttr) -> Attribute {
    match attr {
        StyleAttr::Cursor | StyleAttr::Selection | StyleAttr::Focused => Attribute::Reverse,
        StyleAttr::Emphasis => Attribute::Bold,
        StyleAttr::Disabled => Attribute::Dim,
        StyleAttr::Busy => Attribute::Italic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{StyleLayer, StyleSpan};
    use pretty_assertions::assert_eq;

    #[test]
    fn frame_runs_split_on_span_edges() {
        let mut styles = StyleLayer::new();
        styles.push(StyleSpan {
            line: 0,
            start_col: 3,
            end_col: 5,
            attr: StyleAttr::Focused,
        });
        let frame = Frame {
            lines: vec!["ab cd ef".to_string()],
            styles,
        };
        let w = Writer::from_frame(&frame, 2);
        assert_eq!(
            w.commands(),
            &[
                Command::MoveTo(0, 2),
                Command::ClearLine(0, 2),
                Command::Print("ab ".into()),
                Command::Style(StyleAttr::Focused),
                Command::Print("cd".into()),
                Command::ResetStyle,
                Command::Print(" ef".into()),
            ]
        );
    }

    #[test]
    fn flush_to_buffer_writes_text() {
        let mut w = Writer::new();
        w.move_to(0, 0);
        w.print("Edit");
        let mut buf: Vec<u8> = Vec::new();
        w.flush_to(&mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Edit"));
    }
}
