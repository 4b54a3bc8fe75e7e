//! Board protocols - the timed LED/button sequences the game is played with

use tracing::debug;

use crate::hal::{Delay, HalError, HardwareIo, PinBackend};
use crate::timing::Timing;
use crate::types::{ButtonCode, Pattern, UserInput};

/// Show a pattern: each step lights its LED for `led_on`, then stays dark
/// for `step_gap`.
pub fn display_pattern<B: PinBackend, D: Delay>(
    io: &mut HardwareIo<B, D>,
    pattern: &Pattern,
    timing: &Timing,
) -> Result<(), HalError> {
    for code in pattern.iter() {
        let led = code.led().get();
        io.set_led(led, true)?;
        io.sleep(timing.led_on)?;
        io.set_led(led, false)?;
        io.sleep(timing.step_gap)?;
    }
    Ok(())
}

/// Collect `target_len` presses by sweeping all buttons in scan order.
///
/// Each press is echoed on its LED for `led_on`, then the sweep waits for the
/// release before moving on. A sweep that finds nothing sleeps for
/// `scan_interval`. Stops as soon as the target length is reached.
pub fn collect_input<B: PinBackend, D: Delay>(
    io: &mut HardwareIo<B, D>,
    target_len: usize,
    timing: &Timing,
) -> Result<UserInput, HalError> {
    let mut input = UserInput::with_capacity(target_len);

    while input.len() < target_len {
        let mut pressed_any = false;

        for code in ButtonCode::scan_order() {
            if input.len() >= target_len {
                break;
            }
            if !io.read_button_pressed(code.get())? {
                continue;
            }

            pressed_any = true;
            input.push(code);
            debug!(button = %code, collected = input.len(), target = target_len, "button pressed");

            let led = code.led().get();
            io.set_led(led, true)?;
            io.sleep(timing.led_on)?;
            io.set_led(led, false)?;
            io.await_release(code.get())?;
        }

        if !pressed_any {
            io.sleep(timing.scan_interval)?;
        }
    }

    Ok(input)
}

/// Every LED on for `duration`, then off. One sustained flash, not a blink.
pub fn flash_all<B: PinBackend, D: Delay>(
    io: &mut HardwareIo<B, D>,
    duration: std::time::Duration,
) -> Result<(), HalError> {
    io.set_all_leds(true)?;
    io.sleep(duration)?;
    io.set_all_leds(false)
}
