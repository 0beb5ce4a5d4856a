use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Result of translating a terminal key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeyPressParts {
    pub key: KeyEvent,
    pub repeat: bool,
}

/// Map a crossterm key event into a `KeyEvent`.
///
/// Returns `None` for releases and for keys the panel has no use for
/// (function keys, media keys, vertical navigation).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyPressParts> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let code = map_key_code(&event.code)?;
    let mut mods = map_mods(event.modifiers);
    // Shifted characters arrive already cased; the flag would only block typing.
    if let KeyCode::Char(_) = code {
        mods.remove(KeyModifiers::SHIFT);
    }
    Some(KeyPressParts {
        key: KeyEvent::new(code, mods),
        repeat: matches!(event.kind, CKeyEventKind::Repeat),
    })
}

pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let mapped = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::BackTab => KeyCode::BackTab,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        _ => return None,
    };
    Some(mapped)
}

pub(crate) fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Ctrl-C is surfaced separately so the host can always quit.
pub(crate) fn is_ctrl_c(event: &CKeyEvent) -> bool {
    matches!(event.code, CKeyCode::Char('c' | 'C'))
        && event.modifiers.contains(CKeyModifiers::CONTROL)
        && matches!(event.kind, CKeyEventKind::Press)
}
