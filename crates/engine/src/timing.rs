use std::time::Duration;

use crate::types::{
    GAME_OVER_FLASH_MS, IDLE_POLL_MS, LED_ON_MS, MAX_ROUNDS, ROUND_DELAY_MS, SCAN_INTERVAL_MS,
    STEP_GAP_MS,
};

/// Fixed cadence of the game
///
/// The display cadence (`led_on` then `step_gap`) is part of the public game
/// contract; the defaults come from the named constants in `simon_board_types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub led_on: Duration,
    pub step_gap: Duration,
    pub round_delay: Duration,
    pub idle_poll: Duration,
    pub game_over_flash: Duration,
    pub scan_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            led_on: Duration::from_millis(LED_ON_MS),
            step_gap: Duration::from_millis(STEP_GAP_MS),
            round_delay: Duration::from_millis(ROUND_DELAY_MS),
            idle_poll: Duration::from_millis(IDLE_POLL_MS),
            game_over_flash: Duration::from_millis(GAME_OVER_FLASH_MS),
            scan_interval: Duration::from_millis(SCAN_INTERVAL_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Last playable round; `max_rounds + 1` ends the session unrecorded
    pub max_rounds: u32,
    pub timing: Timing,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            timing: Timing::default(),
        }
    }
}
