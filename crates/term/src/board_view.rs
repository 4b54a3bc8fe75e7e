//! BoardView: maps LED states into terminal lines.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::types::{ButtonCode, LedIndex, BUTTON_COUNT};

pub const TITLE: &str = "Simon board - press 1-8 to play, q to quit";

/// LED states indexed by `LedIndex - 1`
pub type LedStates = [bool; BUTTON_COUNT];

/// One cell per button, in button order, lit when the button's LED is on.
///
/// Cells are labelled by button code, so the player presses the key printed
/// under the lit cell regardless of the button → LED wiring.
pub fn render_leds(leds: &LedStates) -> String {
    (1..=BUTTON_COUNT as u8)
        .filter_map(ButtonCode::new)
        .map(|code| {
            let lit = led_is_on(leds, code.led());
            format!("{}:{}", code, if lit { '●' } else { '○' })
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn led_is_on(leds: &LedStates, led: LedIndex) -> bool {
    leds[(led.get() - 1) as usize]
}
