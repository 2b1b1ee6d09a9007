//! Keybinding dispatcher for planrev.
//!
//! Translates raw crossterm events into review [`Intent`]s (or help-overlay
//! scrolling) and returns a `KeyAction` telling the event loop whether to continue
//! or quit. The dispatcher branches first on `state.mode`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use planrev_core::review::Intent;

use crate::app::{AppState, Mode};

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(intent) = normal_intent(key) {
        state.apply(intent);
        return KeyAction::Continue;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('r') => {
            state.request_reload();
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

/// Maps a Normal-mode key to a review intent, if it is bound to one.
pub fn normal_intent(key: KeyEvent) -> Option<Intent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let intent = match key.code {
        KeyCode::Char('f') if ctrl => Intent::PageDown,
        KeyCode::Char('b') if ctrl => Intent::PageUp,
        _ if ctrl => return None,

        KeyCode::Left | KeyCode::Char('h') => Intent::PrevFile,
        KeyCode::Right | KeyCode::Char('l') => Intent::NextFile,
        KeyCode::Up | KeyCode::Char('k') => Intent::PrevEntry,
        KeyCode::Down | KeyCode::Char('j') => Intent::NextEntry,
        KeyCode::Char('K') => Intent::ScrollUp,
        KeyCode::Char('J') => Intent::ScrollDown,
        KeyCode::PageUp => Intent::PageUp,
        KeyCode::PageDown => Intent::PageDown,
        KeyCode::Tab => Intent::SwitchView,
        KeyCode::Char('d') => Intent::Reject,
        KeyCode::Char('c') | KeyCode::Char('y') => Intent::Copy,
        _ => return None,
    };
    Some(intent)
}

/// Any of `?`, `Esc`, or `q` dismisses the overlay; j/k/g scroll it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

/// Mouse wheel scrolls the active pane, or the help overlay while it is open.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    let down = match mouse.kind {
        MouseEventKind::ScrollUp => false,
        MouseEventKind::ScrollDown => true,
        _ => return KeyAction::Continue,
    };
    if state.mode == Mode::HelpOverlay {
        state.help_scroll = if down {
            state.help_scroll.saturating_add(WHEEL_LINES as u16)
        } else {
            state.help_scroll.saturating_sub(WHEEL_LINES as u16)
        };
        return KeyAction::Continue;
    }
    let intent = if down { Intent::ScrollDown } else { Intent::ScrollUp };
    for _ in 0..WHEEL_LINES {
        state.apply(intent);
    }
    KeyAction::Continue
}
