//! Committed tree plus UI-local state (focus, caret, selection).
//!
//! The `Document` plays the part a browser plays for a web component: it
//! owns the live elements, decides which one has keyboard focus, keeps each
//! input's caret and selection, and turns raw keys into `UiEvent`s. The
//! component owns none of this; it only reaches in through `FocusHost` from
//! its post-commit effects.
//!
//! Commit rules:
//! * Focus is dropped when the focused slot disappears or becomes disabled.
//! * An input keeps its caret when the committed value equals the value the
//!   last edit proposed (controlled echo); an input whose value changed for
//!   any other reason gets its caret moved to the end.
//! * Input state for an unmounted input is discarded.

use crate::RenderError;
use crate::event::{EventHandler, Target, UiEvent, UiEventKind};
use crate::view::{ElementKind, Slot, View};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_text::{FieldEdit, TextField, grapheme};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Focus/selection operations a component may request after commit.
pub trait FocusHost {
    fn focus(&mut self, slot: Slot) -> Result<(), RenderError>;
    /// Select the whole value of an input. Focuses it when enabled; a
    /// disabled input only records the selection.
    fn select_all(&mut self, slot: Slot) -> Result<(), RenderError>;
}

#[derive(Debug, Default)]
pub struct Document {
    view: Option<View>,
    focused: Option<Slot>,
    fields: HashMap<Slot, TextField>,
    pending_edit: Option<(Slot, FieldEdit)>,
    commits: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn focused(&self) -> Option<Slot> {
        self.focused
    }

    pub fn field(&self, slot: Slot) -> Option<&TextField> {
        self.fields.get(&slot)
    }

    /// Currently selected text of an input, if any.
    pub fn selected_text(&self, slot: Slot) -> Option<&str> {
        let value = &self.view.as_ref()?.find(slot)?.text;
        let range = self.fields.get(&slot)?.selection()?;
        value.get(range)
    }

    /// Replace the committed tree.
    pub fn commit(&mut self, view: View) {
        let pending = self.pending_edit.take();
        let mut fields = HashMap::new();
        for el in view.by_kind(ElementKind::TextInput) {
            let Some(slot) = el.slot else { continue };
            let prior_value = self
                .view
                .as_ref()
                .and_then(|v| v.find(slot))
                .map(|p| p.text.as_str());
            let field = match (self.fields.get(&slot), &pending) {
                (Some(existing), Some((pending_slot, edit)))
                    if *pending_slot == slot && edit.value == el.text =>
                {
                    let mut f = *existing;
                    f.apply(edit);
                    f
                }
                (Some(existing), _) if prior_value == Some(el.text.as_str()) => {
                    let mut f = *existing;
                    f.clamp(&el.text);
                    f
                }
                _ => TextField::at_end(&el.text),
            };
            fields.insert(slot, field);
        }
        self.fields = fields;

        if let Some(slot) = self.focused {
            let keep = view
                .find(slot)
                .is_some_and(|el| el.is_focusable_kind() && !el.disabled);
            if !keep {
                debug!(target: "render.document", slot = slot.name(), "focus_dropped");
                self.focused = None;
            }
        }
        self.commits += 1;
        trace!(
            target: "render.document",
            commit = self.commits,
            children = view.children.len(),
            "commit"
        );
        self.view = Some(view);
    }

    /// Translate a key into UI events, deliver them to `handler`, run default
    /// actions, and return every dispatched event in order.
    pub fn dispatch_key<H: EventHandler>(&mut self, key: KeyEvent, handler: &mut H) -> Vec<UiEvent> {
        let mut events = Vec::new();
        let focused = self.focused.and_then(|slot| {
            let el = self.view.as_ref()?.find(slot)?;
            (!el.disabled).then_some((slot, el.kind, el.text.clone()))
        });

        let Some((slot, kind, value)) = focused else {
            let down = UiEvent::new(Target::Document, UiEventKind::KeyDown(key));
            events.push(down);
            self.default_focus_move(key);
            return events;
        };

        let mut down = UiEvent::new(Target::Element(slot), UiEventKind::KeyDown(key));
        handler.handle(&mut down);
        let prevented = down.default_prevented();
        events.push(down);
        if prevented {
            return events;
        }

        if self.default_focus_move(key) {
            return events;
        }
        match kind {
            ElementKind::TextInput => self.input_default(slot, &value, key, handler, &mut events),
            ElementKind::Button(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    events.extend(self.click(slot, handler));
                }
            }
            ElementKind::Info | ElementKind::Label => {}
        }
        events
    }

    /// Activate an element (mouse click or keyboard activation). Disabled or
    /// missing elements swallow the click.
    pub fn click<H: EventHandler>(&mut self, slot: Slot, handler: &mut H) -> Vec<UiEvent> {
        let Some(el) = self.view.as_ref().and_then(|v| v.find(slot)) else {
            return Vec::new();
        };
        if el.disabled || !el.is_focusable_kind() {
            trace!(target: "render.document", slot = slot.name(), "click_ignored");
            return Vec::new();
        }
        let is_submit = el.is_submit();
        self.focused = Some(slot);

        let mut events = Vec::new();
        let mut click = UiEvent::new(Target::Element(slot), UiEventKind::Click);
        handler.handle(&mut click);
        let prevented = click.default_prevented();
        events.push(click);
        if is_submit && !prevented {
            events.push(self.submit(handler));
        }
        events
    }

    fn submit<H: EventHandler>(&mut self, handler: &mut H) -> UiEvent {
        let mut ev = UiEvent::new(Target::Form, UiEventKind::Submit);
        handler.handle(&mut ev);
        if !ev.default_prevented() {
            warn!(target: "render.document", "form_submit_not_prevented");
        }
        ev
    }

    fn input_default<H: EventHandler>(
        &mut self,
        slot: Slot,
        value: &str,
        key: KeyEvent,
        handler: &mut H,
        events: &mut Vec<UiEvent>,
    ) {
        let mut field = self.fields.get(&slot).copied().unwrap_or_else(|| TextField::at_end(value));
        field.clamp(value);
        let typing = !key.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT);
        let edit = match key.code {
            KeyCode::Char(c) if typing => Some(field.insert(value, &c.to_string())),
            KeyCode::Backspace => field.delete_backward(value),
            KeyCode::Delete => field.delete_forward(value),
            KeyCode::Left => {
                field.move_left(value);
                None
            }
            KeyCode::Right => {
                field.move_right(value);
                None
            }
            KeyCode::Home => {
                field.move_home();
                None
            }
            KeyCode::End => {
                field.move_end(value);
                None
            }
            KeyCode::Enter => {
                self.fields.insert(slot, field);
                self.implicit_submit(handler, events);
                return;
            }
            _ => None,
        };
        self.fields.insert(slot, field);

        let Some(edit) = edit else { return };
        if edit.value == value {
            return;
        }
        trace!(
            target: "render.document",
            slot = slot.name(),
            len_bytes = edit.value.len(),
            graphemes = grapheme::count(&edit.value),
            "input_change"
        );
        let mut change = UiEvent::new(Target::Element(slot), UiEventKind::Change(edit.value.clone()));
        self.pending_edit = Some((slot, edit));
        handler.handle(&mut change);
        events.push(change);
    }

    // Enter in a form input submits only when the default button is usable.
    fn implicit_submit<H: EventHandler>(&mut self, handler: &mut H, events: &mut Vec<UiEvent>) {
        let enabled = self
            .view
            .as_ref()
            .and_then(|v| v.submit_button())
            .map(|button| !button.disabled);
        match enabled {
            Some(true) => events.push(self.submit(handler)),
            Some(false) => trace!(target: "render.document", "implicit_submit_blocked"),
            None => {}
        }
    }

    /// Tab / Shift-Tab focus cycling. Returns whether the key was consumed.
    fn default_focus_move(&mut self, key: KeyEvent) -> bool {
        let backward = match key.code {
            KeyCode::Tab if key.mods.contains(KeyModifiers::SHIFT) => true,
            KeyCode::Tab => false,
            KeyCode::BackTab => true,
            _ => return false,
        };
        let Some(view) = self.view.as_ref() else { return true };
        let order = view.focus_order();
        if order.is_empty() {
            return true;
        }
        let current = self.focused.and_then(|s| order.iter().position(|o| *o == s));
        let next = match (current, backward) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
        };
        self.focused = Some(order[next]);
        if let Some(field) = self.fields.get_mut(&order[next]) {
            field.collapse();
        }
        debug!(target: "render.document", slot = order[next].name(), "focus_moved");
        true
    }
}

impl FocusHost for Document {
    fn focus(&mut self, slot: Slot) -> Result<(), RenderError> {
        let el = self
            .view
            .as_ref()
            .and_then(|v| v.find(slot))
            .ok_or(RenderError::Unmounted(slot))?;
        if !el.is_focusable_kind() {
            return Err(RenderError::NotFocusable(slot));
        }
        if el.disabled {
            return Err(RenderError::Disabled(slot));
        }
        self.focused = Some(slot);
        Ok(())
    }

    fn select_all(&mut self, slot: Slot) -> Result<(), RenderError> {
        let el = self
            .view
            .as_ref()
            .and_then(|v| v.find(slot))
            .ok_or(RenderError::Unmounted(slot))?;
        if el.kind != ElementKind::TextInput {
            return Err(RenderError::NotFocusable(slot));
        }
        let disabled = el.disabled;
        let value = el.text.clone();
        self.fields
            .entry(slot)
            .or_insert_with(|| TextField::at_end(&value))
            .select_all(&value);
        if !disabled {
            self.focused = Some(slot);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ButtonType, Element, RootKind};

    const FIELD: Slot = Slot("field");
    const SUBMIT: Slot = Slot("submit");
    const EDIT: Slot = Slot("edit");

    #[derive(Default)]
    struct Recorder {
        seen: Vec<UiEventKind>,
        prevent_submit: bool,
    }

    impl EventHandler for Recorder {
        fn handle(&mut self, event: &mut UiEvent) {
            if self.prevent_submit && matches!(event.kind(), UiEventKind::Submit) {
                event.prevent_default();
            }
            self.seen.push(event.kind().clone());
        }
    }

    fn form(value: &str, disabled: bool) -> View {
        View::new(RootKind::Form, "p")
            .child(Element::text_input("p__title", "p__title-0", value).with_slot(FIELD).disabled(disabled))
            .child(
                Element::button("p__button", "Save", ButtonType::Submit)
                    .with_slot(SUBMIT)
                    .disabled(value.is_empty() || disabled),
            )
    }

    fn display() -> View {
        View::new(RootKind::Div, "p")
            .child(Element::info("p__info", "T"))
            .child(Element::button("p__button", "Edit", ButtonType::Button).with_slot(EDIT))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    #[test]
    fn typing_emits_change_and_keeps_caret_on_echo() {
        let mut doc = Document::new();
        doc.commit(form("ab", false));
        doc.focus(FIELD).unwrap();
        let mut rec = Recorder::default();
        doc.dispatch_key(key(KeyCode::Left), &mut rec);
        doc.dispatch_key(key(KeyCode::Char('X')), &mut rec);
        assert_eq!(rec.seen.last(), Some(&UiEventKind::Change("aXb".into())));
        doc.commit(form("aXb", false));
        assert_eq!(doc.field(FIELD).unwrap().caret(), 2);
    }

    #[test]
    fn external_value_change_moves_caret_to_end() {
        let mut doc = Document::new();
        doc.commit(form("abc", false));
        doc.focus(FIELD).unwrap();
        doc.dispatch_key(key(KeyCode::Home), &mut Recorder::default());
        doc.commit(form("reverted", false));
        assert_eq!(doc.field(FIELD).unwrap().caret(), "reverted".len());
    }

    #[test]
    fn enter_submits_only_when_button_enabled() {
        let mut doc = Document::new();
        doc.commit(form("", false));
        doc.focus(FIELD).unwrap();
        let mut rec = Recorder::default();
        doc.dispatch_key(key(KeyCode::Enter), &mut rec);
        assert!(!rec.seen.contains(&UiEventKind::Submit));

        doc.commit(form("x", false));
        let events = doc.dispatch_key(key(KeyCode::Enter), &mut rec);
        assert_eq!(events.last().map(|e| e.kind()), Some(&UiEventKind::Submit));
    }

    #[test]
    fn clicking_submit_button_submits_form() {
        let mut doc = Document::new();
        doc.commit(form("x", false));
        let mut rec = Recorder {
            prevent_submit: true,
            ..Recorder::default()
        };
        let events = doc.click(SUBMIT, &mut rec);
        assert_eq!(rec.seen, vec![UiEventKind::Click, UiEventKind::Submit]);
        assert!(events[1].default_prevented());
    }

    #[test]
    fn disabled_elements_swallow_clicks() {
        let mut doc = Document::new();
        doc.commit(form("", false));
        let mut rec = Recorder::default();
        assert!(doc.click(SUBMIT, &mut rec).is_empty());
        assert!(rec.seen.is_empty());
    }

    #[test]
    fn focus_dropped_when_slot_unmounts_or_disables() {
        let mut doc = Document::new();
        doc.commit(form("x", false));
        doc.focus(FIELD).unwrap();
        doc.commit(form("x", true));
        assert_eq!(doc.focused(), None);
        doc.commit(display());
        assert_eq!(doc.focus(FIELD), Err(RenderError::Unmounted(FIELD)));
    }

    #[test]
    fn select_all_on_disabled_input_does_not_focus() {
        let mut doc = Document::new();
        doc.commit(form("My Block", true));
        doc.select_all(FIELD).unwrap();
        assert_eq!(doc.focused(), None);
        assert_eq!(doc.selected_text(FIELD), Some("My Block"));
    }

    #[test]
    fn tab_cycles_enabled_focusables() {
        let mut doc = Document::new();
        doc.commit(form("x", false));
        let mut rec = Recorder::default();
        doc.dispatch_key(key(KeyCode::Tab), &mut rec);
        assert_eq!(doc.focused(), Some(FIELD));
        doc.dispatch_key(key(KeyCode::Tab), &mut rec);
        assert_eq!(doc.focused(), Some(SUBMIT));
        doc.dispatch_key(key(KeyCode::BackTab), &mut rec);
        assert_eq!(doc.focused(), Some(FIELD));
    }

    #[test]
    fn unfocused_keys_surface_as_document_events() {
        let mut doc = Document::new();
        doc.commit(display());
        let mut rec = Recorder::default();
        let events = doc.dispatch_key(key(KeyCode::Esc), &mut rec);
        assert!(rec.seen.is_empty());
        assert_eq!(events[0].target(), Target::Document);
        assert_eq!(events[0].unhandled_key(), Some(key(KeyCode::Esc)));
    }

    #[test]
    fn space_on_button_clicks() {
        let mut doc = Document::new();
        doc.commit(display());
        doc.focus(EDIT).unwrap();
        let mut rec = Recorder::default();
        doc.dispatch_key(key(KeyCode::Char(' ')), &mut rec);
        assert_eq!(rec.seen, vec![UiEventKind::KeyDown(key(KeyCode::Char(' '))), UiEventKind::Click]);
    }
}
