//! HardwareIo - the only component that touches physical lines
//!
//! Wraps a [`PinBackend`] with the fixed button/LED mapping, a [`Delay`] for
//! blocking waits, and a [`StopSignal`] that turns any wait into
//! [`HalError::Interrupted`]. Lines are released on every exit path: either an
//! explicit [`HardwareIo::shutdown`] or `Drop`.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::types::{ButtonCode, LedIndex, Level, RELEASE_POLL_MS};
use crate::{Delay, HalError, PinBackend, StopSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Ready,
    ShutDown,
}

pub struct HardwareIo<B: PinBackend, D: Delay> {
    backend: B,
    delay: D,
    stop: StopSignal,
    release_poll: Duration,
    lifecycle: Lifecycle,
}

impl<B: PinBackend, D: Delay> HardwareIo<B, D> {
    pub fn new(backend: B, delay: D, stop: StopSignal) -> Self {
        Self {
            backend,
            delay,
            stop,
            release_poll: Duration::from_millis(RELEASE_POLL_MS),
            lifecycle: Lifecycle::Created,
        }
    }

    /// Override the release sampling interval (default 100ms).
    pub fn with_release_poll(mut self, interval: Duration) -> Self {
        self.release_poll = interval;
        self
    }

    /// Configure every LED line as a low output and every button line as a
    /// pulled-up input. Must be called exactly once, before anything else.
    pub fn initialize(&mut self) -> Result<(), HalError> {
        if self.lifecycle != Lifecycle::Created {
            return Err(HalError::AlreadyInitialized);
        }
        // Mark ready first so a partial failure is still released on drop.
        self.lifecycle = Lifecycle::Ready;

        for led in LedIndex::all() {
            self.backend.configure_output(led.pin(), Level::Low)?;
        }
        for code in ButtonCode::scan_order() {
            self.backend.configure_input_pull_up(code.pin())?;
        }
        info!("hardware initialized");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }

    fn ensure_ready(&self) -> Result<(), HalError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(HalError::NotInitialized)
        }
    }

    /// Drive exactly one LED line.
    pub fn set_led(&mut self, index: u8, on: bool) -> Result<(), HalError> {
        self.ensure_ready()?;
        let led = LedIndex::new(index).ok_or(HalError::InvalidIndex(index))?;
        let level = if on { Level::High } else { Level::Low };
        self.backend.write(led.pin(), level)
    }

    pub fn set_all_leds(&mut self, on: bool) -> Result<(), HalError> {
        for led in LedIndex::all() {
            self.set_led(led.get(), on)?;
        }
        Ok(())
    }

    /// True while the button line reads as pressed (low).
    pub fn read_button_pressed(&mut self, index: u8) -> Result<bool, HalError> {
        self.ensure_ready()?;
        let code = ButtonCode::new(index).ok_or(HalError::InvalidIndex(index))?;
        Ok(self.backend.read(code.pin())?.is_low())
    }

    /// Block until the button returns to its unpressed level.
    ///
    /// Samples every `release_poll`, so one physical press is never counted
    /// twice. Holding the button holds the control loop.
    pub fn await_release(&mut self, index: u8) -> Result<(), HalError> {
        let mut samples = 0u32;
        while self.read_button_pressed(index)? {
            self.check_stop()?;
            self.delay.delay(self.release_poll);
            samples += 1;
        }
        debug!(button = index, samples, "button released");
        Ok(())
    }

    /// Timed wait that honours the stop signal before and after sleeping.
    pub fn sleep(&mut self, duration: Duration) -> Result<(), HalError> {
        self.check_stop()?;
        self.delay.delay(duration);
        self.check_stop()
    }

    pub fn check_stop(&self) -> Result<(), HalError> {
        if self.stop.is_triggered() {
            Err(HalError::Interrupted)
        } else {
            Ok(())
        }
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Drive every LED low and release all lines.
    ///
    /// Keeps going after a failing line and reports the first error. Calling
    /// it again (or dropping afterwards) is a no-op.
    pub fn shutdown(&mut self) -> Result<(), HalError> {
        if self.lifecycle != Lifecycle::Ready {
            return Ok(());
        }
        self.lifecycle = Lifecycle::ShutDown;

        let mut first_err = None;
        for led in LedIndex::all() {
            let pin = led.pin();
            let result = self
                .backend
                .write(pin, Level::Low)
                .and_then(|_| self.backend.release(pin));
            if let Err(e) = result {
                first_err.get_or_insert(e);
            }
        }
        for code in ButtonCode::scan_order() {
            if let Err(e) = self.backend.release(code.pin()) {
                first_err.get_or_insert(e);
            }
        }

        info!("hardware released");
        first_err.map_or(Ok(()), Err)
    }
}

impl<B: PinBackend, D: Delay> Drop for HardwareIo<B, D> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!(error = %e, "hardware cleanup failed");
        }
    }
}
