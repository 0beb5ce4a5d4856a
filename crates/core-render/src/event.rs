//! DOM-style UI events delivered from the `Document` to a component.
//!
//! A key press becomes a `KeyDown` on the focused element; its default action
//! (text edit, focus move, button activation, implicit submission) only runs
//! when the handler did not call `prevent_default`. Handlers call
//! `stop_propagation` to keep ancestors (the host application) from reacting
//! to the same event; the dispatched events are handed back to the caller so
//! it can act as that ancestor.

use crate::view::Slot;
use core_events::KeyEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Nothing in the component has focus.
    Document,
    Form,
    Element(Slot),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEventKind {
    Click,
    KeyDown(KeyEvent),
    /// The input's value changed to the carried string.
    Change(String),
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    target: Target,
    kind: UiEventKind,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl UiEvent {
    pub fn new(target: Target, kind: UiEventKind) -> Self {
        Self {
            target,
            kind,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn kind(&self) -> &UiEventKind {
        &self.kind
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Key carried by a `KeyDown` that was allowed to bubble past the component.
    pub fn unhandled_key(&self) -> Option<KeyEvent> {
        match self.kind {
            UiEventKind::KeyDown(key) if !self.propagation_stopped => Some(key),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            UiEventKind::Click => "click",
            UiEventKind::KeyDown(_) => "keydown",
            UiEventKind::Change(_) => "change",
            UiEventKind::Submit => "submit",
        }
    }
}

/// Component-side receiver for dispatched events.
pub trait EventHandler {
    fn handle(&mut self, event: &mut UiEvent);
}
