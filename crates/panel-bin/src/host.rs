//! The block editor: parent state owner for the panel.

use core_panel::{PanelCallbacks, PanelProps};
use tracing::info;

/// Title state of one reusable block plus the panel's mode flags.
///
/// `saved_title` is what the last completed save persisted; cancelling an
/// edit reverts `title` to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEditor {
    pub title: String,
    pub saved_title: String,
    pub is_editing: bool,
    pub is_saving: bool,
    pub is_edit_disabled: bool,
    save_requested: bool,
}

impl BlockEditor {
    pub fn new(title: impl Into<String>, is_edit_disabled: bool) -> Self {
        let title = title.into();
        Self {
            saved_title: title.clone(),
            title,
            is_editing: false,
            is_saving: false,
            is_edit_disabled,
            save_requested: false,
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

    /// Whether a save was requested since the last call.
    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.save_requested)
    }

    /// The persistence round-trip finished.
    pub fn complete_save(&mut self) {
        if !self.is_saving {
            return;
        }
        self.saved_title = self.title.clone();
        self.is_saving = false;
        info!(target: "runtime", title_len = self.title.len(), "save_completed");
    }

    /// Display mode: neither editing nor saving.
    pub fn is_idle(&self) -> bool {
        !self.is_editing && !self.is_saving
    }
}

impl PanelCallbacks for BlockEditor {
    fn on_cancel(&mut self) {
        self.is_editing = false;
        self.title = self.saved_title.clone();
    }

    fn on_change_title(&mut self, title: String) {
        self.title = title;
    }

    fn on_edit(&mut self) {
        self.is_editing = true;
    }

    fn on_save(&mut self) {
        if self.is_saving {
            return;
        }
        self.is_editing = false;
        self.is_saving = true;
        self.save_requested = true;
        info!(target: "runtime", title_len = self.title.len(), "save_started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_reverts_to_saved_title() {
        let mut ed = BlockEditor::new("My Block", false);
        ed.on_edit();
        ed.on_change_title("Draft".into());
        ed.on_cancel();
        assert!(ed.is_idle());
        assert_eq!(ed.title, "My Block");
    }

    #[test]
    fn save_round_trip_persists_title() {
        let mut ed = BlockEditor::new("My Block", false);
        ed.on_edit();
        ed.on_change_title("New Name".into());
        ed.on_save();
        assert!(ed.is_saving && !ed.is_editing);
        assert!(ed.take_save_request());
        assert!(!ed.take_save_request());
        ed.complete_save();
        assert!(ed.is_idle());
        assert_eq!(ed.saved_title, "New Name");
    }

    #[test]
    fn second_save_while_saving_is_ignored() {
        let mut ed = BlockEditor::new("x", false);
        ed.on_save();
        ed.take_save_request();
        ed.on_save();
        assert!(!ed.take_save_request());
    }

    #[test]
    fn stray_completion_is_ignored() {
        let mut ed = BlockEditor::new("x", false);
        ed.title = "unsaved".into();
        ed.complete_save();
        assert_eq!(ed.saved_title, "x");
    }
}
