//! Reusable block edit panel.
//!
//! A small form for naming a reusable content block. It toggles between a
//! display row (title plus an "Edit" button) and an edit form (labelled
//! title input plus a "Save" button). The panel owns no domain state: the
//! parent passes `PanelProps` on every render and receives user intent back
//! through `PanelCallbacks`.
//!
//! Render cycle (driven by the host):
//! 1. `ReusableBlockEditPanel::render(&props)` builds the `View` and queues
//!    the focus effects for this render.
//! 2. The host commits the view into its `Document`.
//! 3. `flush_effects(&mut document)` runs the focus rules against the
//!    committed tree and records this render as the previous one. Flushing
//!    again before the next render is a no-op.
//!
//! Events flow the other way: the host dispatches keys through the
//! `Document` with a `PanelHandler`, which calls back into the parent.

pub mod effects;
pub mod handler;
pub mod labels;
pub mod panel;

pub use effects::{EffectOutcome, FocusEffects};
pub use handler::PanelHandler;
pub use labels::Labels;
pub use panel::ReusableBlockEditPanel;

use core_render::Slot;

pub const PANEL_CLASS: &str = "reusable-block-edit-panel";
pub const INFO_CLASS: &str = "reusable-block-edit-panel__info";
pub const BUTTON_CLASS: &str = "reusable-block-edit-panel__button";
pub const LABEL_CLASS: &str = "reusable-block-edit-panel__label";
pub const TITLE_CLASS: &str = "reusable-block-edit-panel__title";

pub const EDIT_BUTTON: Slot = Slot("edit-button");
pub const TITLE_FIELD: Slot = Slot("title-field");
pub const SAVE_BUTTON: Slot = Slot("save-button");

/// Inputs supplied by the parent on every render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelProps<'a> {
    pub is_edit_disabled: bool,
    pub is_editing: bool,
    pub is_saving: bool,
    pub title: &'a str,
}

/// Parent-side reactions to user intent.
pub trait PanelCallbacks {
    /// Escape pressed in the title input.
    fn on_cancel(&mut self);
    /// The title input's value changed; `title` is the full new value.
    fn on_change_title(&mut self, title: String);
    /// The Edit button was activated.
    fn on_edit(&mut self);
    /// The form was submitted.
    fn on_save(&mut self);
}
