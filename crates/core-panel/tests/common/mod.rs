#![allow(dead_code)]

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_panel::{EffectOutcome, PanelCallbacks, PanelHandler, PanelProps, ReusableBlockEditPanel};
use core_render::{Document, Slot, UiEvent};

/// Parent state owner used by the scenarios; records every callback.
#[derive(Debug, Default)]
pub struct Parent {
    pub title: String,
    pub is_editing: bool,
    pub is_saving: bool,
    pub is_edit_disabled: bool,
    pub cancels: u32,
    pub edits: u32,
    pub saves: u32,
    pub titles: Vec<String>,
}

impl Parent {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn props(&self) -> PanelProps<'_> {
        PanelProps {
            is_edit_disabled: self.is_edit_disabled,
            is_editing: self.is_editing,
            is_saving: self.is_saving,
            title: &self.title,
        }
    }
}

/// Records only; the scenario decides when the flags change.
impl PanelCallbacks for Parent {
    fn on_cancel(&mut self) {
        self.cancels += 1;
    }
    fn on_change_title(&mut self, title: String) {
        self.titles.push(title.clone());
        self.title = title;
    }
    fn on_edit(&mut self) {
        self.edits += 1;
    }
    fn on_save(&mut self) {
        self.saves += 1;
    }
}

pub struct Harness {
    pub panel: ReusableBlockEditPanel,
    pub doc: Document,
    pub parent: Parent,
}

impl Harness {
    pub fn new(title: &str) -> Self {
        let mut h = Self {
            panel: ReusableBlockEditPanel::default(),
            doc: Document::new(),
            parent: Parent::new(title),
        };
        h.cycle();
        h
    }

    /// Render → commit → flush effects.
    pub fn cycle(&mut self) -> EffectOutcome {
        let view = self.panel.render(&self.parent.props());
        self.doc.commit(view);
        self.panel
            .flush_effects(&mut self.doc)
            .expect("effects resolve against committed tree")
    }

    pub fn set_flags(&mut self, is_editing: bool, is_saving: bool) -> EffectOutcome {
        self.parent.is_editing = is_editing;
        self.parent.is_saving = is_saving;
        self.cycle()
    }

    pub fn key(&mut self, code: KeyCode) -> Vec<UiEvent> {
        self.key_with(code, KeyModifiers::empty())
    }

    pub fn key_with(&mut self, code: KeyCode, mods: KeyModifiers) -> Vec<UiEvent> {
        let mut handler = PanelHandler::new(&mut self.parent);
        let events = self.doc.dispatch_key(KeyEvent::new(code, mods), &mut handler);
        self.cycle();
        events
    }

    pub fn click(&mut self, slot: Slot) -> Vec<UiEvent> {
        let mut handler = PanelHandler::new(&mut self.parent);
        let events = self.doc.click(slot, &mut handler);
        self.cycle();
        events
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c));
        }
    }
}
