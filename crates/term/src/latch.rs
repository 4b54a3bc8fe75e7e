//! Key presses latched until the board reads them.
//!
//! A terminal only reports the moment a key goes down. Each press is queued
//! on its button and handed out by the next read of that line, which then
//! reads low for `hold` and high afterwards. A press made while the game is
//! busy elsewhere (echoing another button, say) is kept until the sweep
//! reaches it instead of expiring unseen.

use std::time::{Duration, Instant};

use crate::types::{ButtonCode, Level, BUTTON_COUNT};

/// How long a consumed press keeps its button line low
pub const KEY_HOLD_MS: u64 = 150;

/// Unread presses older than this are dropped
pub const PRESS_MAX_AGE_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, Default)]
struct LatchedButton {
    pending: u32,
    last_press: Option<Instant>,
    down_since: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct PressLatch {
    buttons: [LatchedButton; BUTTON_COUNT],
    hold: Duration,
    max_age: Duration,
}

impl Default for PressLatch {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(KEY_HOLD_MS),
            Duration::from_millis(PRESS_MAX_AGE_MS),
        )
    }
}

impl PressLatch {
    pub fn new(hold: Duration, max_age: Duration) -> Self {
        Self {
            buttons: [LatchedButton::default(); BUTTON_COUNT],
            hold,
            max_age,
        }
    }

    pub fn press(&mut self, code: ButtonCode, now: Instant) {
        let button = self.button(code);
        button.pending += 1;
        button.last_press = Some(now);
    }

    /// Level of the button line at `now`.
    pub fn read(&mut self, code: ButtonCode, now: Instant) -> Level {
        let (hold, max_age) = (self.hold, self.max_age);
        let button = self.button(code);

        if let Some(since) = button.down_since {
            if now.saturating_duration_since(since) < hold {
                return Level::Low;
            }
            button.down_since = None;
            return Level::High;
        }

        if button.pending == 0 {
            return Level::High;
        }
        let fresh = button
            .last_press
            .is_some_and(|at| now.saturating_duration_since(at) < max_age);
        if !fresh {
            button.pending = 0;
            return Level::High;
        }

        button.pending -= 1;
        button.down_since = Some(now);
        Level::Low
    }

    /// Presses not yet handed out
    pub fn pending(&self, code: ButtonCode) -> u32 {
        self.buttons[(code.get() - 1) as usize].pending
    }

    fn button(&mut self, code: ButtonCode) -> &mut LatchedButton {
        &mut self.buttons[(code.get() - 1) as usize]
    }
}
