//! Terminal board module.
//!
//! Simulates the LED/button board in a terminal so the controller can be run
//! and played on a development host without GPIO:
//!
//! - LEDs are drawn as a row of cells labelled with their button code
//! - keys `1`–`8` press buttons; `q`, Esc or Ctrl-C raise the stop signal
//! - a key press is latched until the scan reads its button, so presses made
//!   while another button is echoed are not lost
//!
//! Log output should go to a file while the board owns the screen.

pub mod board;
pub mod board_view;
pub mod keymap;
pub mod latch;

pub use simon_board_hal as hal;
pub use simon_board_types as types;

pub use board::TerminalBoard;
pub use board_view::{render_leds, LedStates};
pub use keymap::{map_key, KeyAction};
pub use latch::{PressLatch, KEY_HOLD_MS, PRESS_MAX_AGE_MS};
