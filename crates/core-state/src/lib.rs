//! Per-instance bookkeeping for stateless panels: derived mode, previous-render
//! memory, and instance identity.
//!
//! Nothing here is persistent. The parent application owns the editing and
//! saving flags and the title; components only derive a `Mode` from the flags
//! each render and remember what the flags were on the render before.
//!
//! Mode derivation:
//! - `Display` iff both flags are false.
//! - `Saving` whenever `is_saving` is true, including the transient state
//!   where `is_editing` is still true.
//! - `Editing` otherwise.
//!
//! `Editing` and `Saving` share the form layout (`Mode::shows_form`); the
//! display branch and the form branch are complementary, so every flag pair
//! produces exactly one of them.

pub mod instance_id;
pub mod previous;

pub use instance_id::{InstanceId, InstanceIdCounter};
pub use previous::Previous;

/// Flags the parent hands to the panel on every render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EditFlags {
    pub is_editing: bool,
    pub is_saving: bool,
}

impl EditFlags {
    pub const fn new(is_editing: bool, is_saving: bool) -> Self {
        Self {
            is_editing,
            is_saving,
        }
    }

    pub const fn mode(self) -> Mode {
        Mode::from_flags(self.is_editing, self.is_saving)
    }

    /// Either flag set (form branch active).
    pub const fn any(self) -> bool {
        self.is_editing || self.is_saving
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Display,
    Editing,
    Saving,
}

impl Mode {
    pub const fn from_flags(is_editing: bool, is_saving: bool) -> Self {
        if is_saving {
            Mode::Saving
        } else if is_editing {
            Mode::Editing
        } else {
            Mode::Display
        }
    }

    pub const fn shows_form(self) -> bool {
        !matches!(self, Mode::Display)
    }

    /// Input and submit are locked while a save is in flight.
    pub const fn is_locked(self) -> bool {
        matches!(self, Mode::Saving)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Display => "display",
            Mode::Editing => "editing",
            Mode::Saving => "saving",
        }
    }
}
