//! Post-commit focus rules.
//!
//! Both rules are edge-triggered on the flag snapshot captured at render
//! time (`was` = flags of the last flushed render, absent counting as false):
//!
//! 1. `was.is_editing == false && is.is_editing` → select the whole title.
//! 2. `was.any() && !is.any()` → focus the Edit button.
//!
//! The rules are mutually exclusive (rule 1 needs `is.is_editing`, rule 2
//! needs it clear), so at most one fires per render.

use crate::{EDIT_BUTTON, TITLE_FIELD};
use core_render::{FocusHost, RenderError};
use core_state::EditFlags;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEffects {
    pub was: EditFlags,
    pub is: EditFlags,
}

/// What a flush actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectOutcome {
    pub selected_title: bool,
    pub focused_edit: bool,
}

impl EffectOutcome {
    pub fn is_noop(&self) -> bool {
        !self.selected_title && !self.focused_edit
    }
}

impl FocusEffects {
    pub fn selects_title(&self) -> bool {
        !self.was.is_editing && self.is.is_editing
    }

    pub fn returns_focus(&self) -> bool {
        self.was.any() && !self.is.any()
    }

    pub fn run<H: FocusHost + ?Sized>(self, host: &mut H) -> Result<EffectOutcome, RenderError> {
        let mut outcome = EffectOutcome::default();
        if self.selects_title() {
            host.select_all(TITLE_FIELD)?;
            outcome.selected_title = true;
            info!(target: "panel.effects", "title_selected");
        }
        if self.returns_focus() {
            match host.focus(EDIT_BUTTON) {
                Ok(()) => {
                    outcome.focused_edit = true;
                    info!(
                        target: "panel.effects",
                        after_save = self.was.is_saving,
                        "focus_returned"
                    );
                }
                // Focusing a disabled control is a silent no-op in the host toolkit.
                Err(RenderError::Disabled(slot)) => {
                    debug!(target: "panel.effects", slot = slot.name(), "focus_return_skipped_disabled");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(outcome)
    }
}
