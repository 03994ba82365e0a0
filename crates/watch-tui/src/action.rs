//! Action enum — user intents, decoded from key presses.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Poll every running loop now.
    Refresh,
    ToggleSchedule,
    /// Dev override: step through the layouts by hand.
    CycleLayout,
    /// Dev override off, back to the derived mode.
    ClearLayoutOverride,
    ScrollUp(usize),
    ScrollDown(usize),
}

pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('s') => Some(Action::ToggleSchedule),
        KeyCode::Char('l') => Some(Action::CycleLayout),
        KeyCode::Char('0') => Some(Action::ClearLayoutOverride),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp(1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown(1)),
        KeyCode::PageUp => Some(Action::ScrollUp(10)),
        KeyCode::PageDown => Some(Action::ScrollDown(10)),
        _ => None,
    }
}
