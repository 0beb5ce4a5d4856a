//! Event wiring between the committed panel tree and the parent's callbacks.

use crate::{EDIT_BUTTON, PanelCallbacks, TITLE_FIELD};
use core_render::{EventHandler, Target, UiEvent, UiEventKind};
use tracing::debug;

pub struct PanelHandler<'a, C: PanelCallbacks> {
    callbacks: &'a mut C,
}

impl<'a, C: PanelCallbacks> PanelHandler<'a, C> {
    pub fn new(callbacks: &'a mut C) -> Self {
        Self { callbacks }
    }
}

impl<C: PanelCallbacks> EventHandler for PanelHandler<'_, C> {
    fn handle(&mut self, event: &mut UiEvent) {
        match (event.target(), event.kind().clone()) {
            (Target::Element(EDIT_BUTTON), UiEventKind::Click) => {
                debug!(target: "panel.event", event = event.name(), "edit");
                self.callbacks.on_edit();
            }
            (Target::Element(TITLE_FIELD), UiEventKind::Change(value)) => {
                debug!(target: "panel.event", len_bytes = value.len(), "change_title");
                self.callbacks.on_change_title(value);
            }
            (Target::Element(TITLE_FIELD), UiEventKind::KeyDown(key)) if key.is_escape() => {
                event.stop_propagation();
                debug!(target: "panel.event", "cancel");
                self.callbacks.on_cancel();
            }
            (Target::Form, UiEventKind::Submit) => {
                event.prevent_default();
                debug!(target: "panel.event", "save");
                self.callbacks.on_save();
            }
            _ => {}
        }
    }
}
