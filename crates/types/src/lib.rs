//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the controller.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (game logic, pin backends, the collaborator protocol).
//!
//! # Pin Mapping
//!
//! Eight momentary buttons and eight indicator LEDs, each addressed by a logical
//! index 1..=8. The physical lines are BCM GPIO numbers:
//!
//! | Logical | Button line | LED line |
//! |---------|-------------|----------|
//! | 1 | 6  | 4  |
//! | 2 | 12 | 17 |
//! | 3 | 13 | 18 |
//! | 4 | 16 | 27 |
//! | 5 | 19 | 22 |
//! | 6 | 20 | 23 |
//! | 7 | 26 | 24 |
//! | 8 | 21 | 25 |
//!
//! Button codes are wired to LEDs through [`BUTTON_TO_LED`], which also fixes the
//! scan order used when collecting input.
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LED_ON_MS` | 500 | How long one pattern step (or input echo) stays lit |
//! | `STEP_GAP_MS` | 200 | Dark gap between pattern steps |
//! | `ROUND_DELAY_MS` | 1000 | Pause before each round's pattern |
//! | `IDLE_POLL_MS` | 1000 | Session-start polling interval |
//! | `RELEASE_POLL_MS` | 100 | Button-release sampling interval |
//! | `GAME_OVER_FLASH_MS` | 3000 | All-LED flash on game over |
//! | `SCAN_INTERVAL_MS` | 10 | Sleep between empty input sweeps |
//!
//! # Examples
//!
//! ```
//! use simon_board_types::{ButtonCode, LedIndex, MAX_ROUNDS};
//!
//! let code = ButtonCode::new(4).unwrap();
//! assert_eq!(code.led(), LedIndex::new(1).unwrap());
//! assert_eq!(code.pin(), 16);
//! assert_eq!(code.led().pin(), 4);
//!
//! assert!(ButtonCode::new(0).is_none());
//! assert_eq!(MAX_ROUNDS, 99);
//! ```

use std::fmt;

/// Number of buttons (and LEDs) on the board
pub const BUTTON_COUNT: usize = 8;

/// Highest playable round; reaching `MAX_ROUNDS + 1` ends the session
pub const MAX_ROUNDS: u32 = 99;

/// LED on-time for one pattern step or input echo
pub const LED_ON_MS: u64 = 500;

/// Dark gap after each pattern step
pub const STEP_GAP_MS: u64 = 200;

/// Pause before a round's pattern is shown
pub const ROUND_DELAY_MS: u64 = 1000;

/// Interval between session-start checks while idle
pub const IDLE_POLL_MS: u64 = 1000;

/// Sampling interval while waiting for a button to be released
pub const RELEASE_POLL_MS: u64 = 100;

/// Duration of the sustained all-LED flash on game over
pub const GAME_OVER_FLASH_MS: u64 = 3000;

/// Sleep between full input sweeps that found no press
pub const SCAN_INTERVAL_MS: u64 = 10;

/// Physical input line for each button, indexed by `code - 1`
pub const BUTTON_PINS: [u8; BUTTON_COUNT] = [6, 12, 13, 16, 19, 20, 26, 21];

/// Physical output line for each LED, indexed by `led - 1`
pub const LED_PINS: [u8; BUTTON_COUNT] = [4, 17, 18, 27, 22, 23, 24, 25];

/// Button code → LED index, in input scan order
pub const BUTTON_TO_LED: [(u8, u8); BUTTON_COUNT] = [
    (4, 1),
    (3, 2),
    (2, 3),
    (1, 4),
    (8, 5),
    (7, 6),
    (6, 7),
    (5, 8),
];

/// Logical line level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

/// A button code (1..=8), the unit a pattern is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonCode(u8);

impl ButtonCode {
    /// Returns `None` outside 1..=8.
    pub fn new(code: u8) -> Option<Self> {
        (1..=BUTTON_COUNT as u8).contains(&code).then_some(Self(code))
    }

    /// Button for a zero-based index (0 → code 1).
    ///
    /// Indexes at or beyond `BUTTON_COUNT` wrap around.
    pub fn from_index(index: usize) -> Self {
        Self((index % BUTTON_COUNT) as u8 + 1)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Buttons in the fixed scan order of [`BUTTON_TO_LED`]
    pub fn scan_order() -> impl Iterator<Item = ButtonCode> {
        BUTTON_TO_LED.iter().map(|&(code, _)| ButtonCode(code))
    }

    /// LED this button is wired to
    pub fn led(self) -> LedIndex {
        BUTTON_TO_LED
            .iter()
            .find(|&&(code, _)| code == self.0)
            .map(|&(_, led)| LedIndex(led))
            .unwrap_or(LedIndex(self.0))
    }

    /// Physical input line
    pub fn pin(self) -> u8 {
        BUTTON_PINS[(self.0 - 1) as usize]
    }
}

impl fmt::Display for ButtonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An LED index (1..=8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedIndex(u8);

impl LedIndex {
    /// Returns `None` outside 1..=8.
    pub fn new(index: u8) -> Option<Self> {
        (1..=BUTTON_COUNT as u8).contains(&index).then_some(Self(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All LEDs in index order
    pub fn all() -> impl Iterator<Item = LedIndex> {
        (1..=BUTTON_COUNT as u8).map(LedIndex)
    }

    /// Physical output line
    pub fn pin(self) -> u8 {
        LED_PINS[(self.0 - 1) as usize]
    }
}

impl fmt::Display for LedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A round's target sequence
///
/// Immutable once built; its length is the round number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern(Vec<ButtonCode>);

impl Pattern {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ButtonCode] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = ButtonCode> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<ButtonCode>> for Pattern {
    fn from(codes: Vec<ButtonCode>) -> Self {
        Self(codes)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", code)?;
        }
        write!(f, "]")
    }
}

/// The player's collected presses for the current round
pub type UserInput = Vec<ButtonCode>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn button_to_led_is_a_bijection() {
        let codes: HashSet<u8> = BUTTON_TO_LED.iter().map(|&(c, _)| c).collect();
        let leds: HashSet<u8> = BUTTON_TO_LED.iter().map(|&(_, l)| l).collect();
        assert_eq!(codes, (1..=8).collect());
        assert_eq!(leds, (1..=8).collect());
    }

    #[test]
    fn physical_lines_are_distinct() {
        let mut all: Vec<u8> = BUTTON_PINS.iter().chain(LED_PINS.iter()).copied().collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), BUTTON_COUNT * 2);
    }

    #[test]
    fn scan_order_follows_mapping_table() {
        let order: Vec<u8> = ButtonCode::scan_order().map(ButtonCode::get).collect();
        assert_eq!(order, vec![4, 3, 2, 1, 8, 7, 6, 5]);
    }

    #[test]
    fn code_range_is_enforced() {
        assert!(ButtonCode::new(0).is_none());
        assert!(ButtonCode::new(9).is_none());
        assert!(LedIndex::new(0).is_none());
        assert!(LedIndex::new(9).is_none());
        for n in 1..=8 {
            assert_eq!(ButtonCode::new(n).map(ButtonCode::get), Some(n));
        }
    }

    #[test]
    fn button_lines_follow_board_wiring() {
        assert_eq!(ButtonCode::new(1).unwrap().pin(), 6);
        assert_eq!(ButtonCode::new(8).unwrap().pin(), 21);
        assert_eq!(ButtonCode::new(7).unwrap().led().pin(), 23);
        assert_eq!(ButtonCode::new(5).unwrap().led().get(), 8);
    }

    #[test]
    fn pattern_display() {
        let p = Pattern::from(vec![ButtonCode::from_index(3), ButtonCode::from_index(6)]);
        assert_eq!(p.to_string(), "[4,7]");
        assert_eq!(p.len(), 2);
    }
}
