//! Rendering layer for headless UI components.
//!
//! Components produce a `View` (plain data) on every render. The `Document`
//! commits it, owns focus and input caret/selection state, and turns keys
//! into DOM-style `UiEvent`s. `paint` lays the committed view out as terminal
//! text with a `StyleLayer`, and `Writer` emits it through crossterm.
//!
//! Exposed Components:
//! - `view`: element tree, `Slot` handles, class tokens.
//! - `event`: `UiEvent`, `EventHandler`, prevent-default / stop-propagation flags.
//! - `document`: commit rules, key dispatch, default actions, `FocusHost`.
//! - `paint` / `style` / `writer`: frame layout, column spans, terminal emission.
//!
//! Components reach elements only through `Slot`s resolved by `FocusHost`
//! at effect time; a slot that is not mounted (or cannot take focus) yields a
//! `RenderError` rather than a panic.

pub mod document;
pub mod event;
pub mod paint;
pub mod style;
pub mod view;
pub mod writer;

pub use document::{Document, FocusHost};
pub use event::{EventHandler, Target, UiEvent, UiEventKind};
pub use paint::{Frame, paint};
pub use view::{ButtonType, Element, ElementKind, RootKind, Slot, View};
pub use writer::Writer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("element `{0}` is not mounted")]
    Unmounted(Slot),
    #[error("element `{0}` is disabled")]
    Disabled(Slot),
    #[error("element `{0}` cannot take focus")]
    NotFocusable(Slot),
}
