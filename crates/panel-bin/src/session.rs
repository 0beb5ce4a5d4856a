//! One panel mounted in a document, driven by normalized key events.

use crate::host::BlockEditor;
use core_events::{KeyCode, KeyEvent};
use core_panel::{Labels, PanelHandler, ReusableBlockEditPanel};
use core_render::{Document, Frame, paint};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The panel submitted; the host should arm the save completion.
    ScheduleSave,
    Quit,
}

pub struct Session {
    panel: ReusableBlockEditPanel,
    doc: Document,
    editor: BlockEditor,
    width: u16,
}

impl Session {
    pub fn new(labels: Labels, editor: BlockEditor, width: u16) -> Self {
        let mut session = Self {
            panel: ReusableBlockEditPanel::new(labels),
            doc: Document::new(),
            editor,
            width,
        };
        session.cycle();
        session
    }

    pub fn editor(&self) -> &BlockEditor {
        &self.editor
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Render, commit, then run the panel's focus effects.
    fn cycle(&mut self) {
        let view = self.panel.render(&self.editor.props());
        self.doc.commit(view);
        if let Err(err) = self.panel.flush_effects(&mut self.doc) {
            warn!(target: "runtime", error = %err, "focus_effect_failed");
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let idle_before = self.editor.is_idle();
        let events = {
            let mut handler = PanelHandler::new(&mut self.editor);
            self.doc.dispatch_key(key, &mut handler)
        };
        // Keys the panel let through act as host shortcuts, but only from
        // display mode so typing `q` into the title stays text.
        let quit = idle_before
            && events
                .iter()
                .filter_map(|ev| ev.unhandled_key())
                .any(|k| k.mods.is_empty() && matches!(k.code, KeyCode::Esc | KeyCode::Char('q')));
        if quit {
            debug!(target: "runtime", "quit_key");
            return Flow::Quit;
        }
        self.cycle();
        if self.editor.take_save_request() {
            Flow::ScheduleSave
        } else {
            Flow::Continue
        }
    }

    pub fn complete_save(&mut self) {
        self.editor.complete_save();
        self.cycle();
    }

    pub fn resize(&mut self, width: u16) {
        self.width = width;
    }

    pub fn frame(&self) -> Frame {
        paint(&self.doc, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_panel::{EDIT_BUTTON, TITLE_FIELD};
    use pretty_assertions::assert_eq;

    fn session(title: &str) -> Session {
        Session::new(Labels::default(), BlockEditor::new(title, false), 60)
    }

    fn press(s: &mut Session, code: KeyCode) -> Flow {
        s.handle_key(KeyEvent::plain(code))
    }

    fn type_text(s: &mut Session, text: &str) {
        for c in text.chars() {
            assert_eq!(press(s, KeyCode::Char(c)), Flow::Continue);
        }
    }

    #[test]
    fn tab_then_enter_opens_editor_with_title_selected() {
        let mut s = session("My Block");
        assert_eq!(s.frame().text(), "My Block [ Edit ]");
        press(&mut s, KeyCode::Tab);
        assert_eq!(s.document().focused(), Some(EDIT_BUTTON));
        press(&mut s, KeyCode::Enter);
        assert!(s.editor().is_editing);
        assert_eq!(s.document().focused(), Some(TITLE_FIELD));
        assert_eq!(s.document().selected_text(TITLE_FIELD), Some("My Block"));
    }

    #[test]
    fn typing_q_in_the_form_is_text_not_quit() {
        let mut s = session("My Block");
        press(&mut s, KeyCode::Tab);
        press(&mut s, KeyCode::Enter);
        type_text(&mut s, "q");
        assert_eq!(s.editor().title, "q");
    }

    #[test]
    fn escape_in_form_cancels_without_quitting() {
        let mut s = session("My Block");
        press(&mut s, KeyCode::Tab);
        press(&mut s, KeyCode::Enter);
        type_text(&mut s, "Draft");
        assert_eq!(press(&mut s, KeyCode::Esc), Flow::Continue);
        assert!(s.editor().is_idle());
        assert_eq!(s.editor().title, "My Block");
        assert_eq!(s.document().focused(), Some(EDIT_BUTTON));
        assert_eq!(press(&mut s, KeyCode::Esc), Flow::Quit);
    }

    #[test]
    fn enter_saves_then_completion_returns_focus() {
        let mut s = session("My Block");
        press(&mut s, KeyCode::Tab);
        press(&mut s, KeyCode::Enter);
        type_text(&mut s, "New Name");
        assert_eq!(press(&mut s, KeyCode::Enter), Flow::ScheduleSave);
        assert!(s.editor().is_saving);
        assert_eq!(s.document().focused(), None);
        // Keys while saving go nowhere and never quit.
        assert_eq!(press(&mut s, KeyCode::Esc), Flow::Continue);

        s.complete_save();
        assert_eq!(s.editor().saved_title, "New Name");
        assert_eq!(s.document().focused(), Some(EDIT_BUTTON));
        assert_eq!(s.frame().text(), "New Name [ Edit ]");
    }

    #[test]
    fn locked_block_cannot_enter_edit() {
        let mut s = Session::new(Labels::default(), BlockEditor::new("Locked", true), 60);
        press(&mut s, KeyCode::Tab);
        press(&mut s, KeyCode::Enter);
        assert!(s.editor().is_idle());
        assert_eq!(press(&mut s, KeyCode::Char('q')), Flow::Quit);
    }
}
