//! Key mapping from terminal events to board input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::ButtonCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(ButtonCode),
    Quit,
}

/// Digits `1`–`8` press the matching button; `q` or Ctrl-C quits.
pub fn map_key(key: KeyEvent) -> Option<KeyAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(KeyAction::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char(c) => c
            .to_digit(10)
            .and_then(|d| ButtonCode::new(d as u8))
            .map(KeyAction::Press),
        _ => None,
    }
}
