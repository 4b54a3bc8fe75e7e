//! Hardware abstraction traits
//!
//! These traits define pin access and blocking delays without a concrete
//! implementation, so the game loop can run against real GPIO, a terminal
//! simulation, or a scripted board in tests.

use std::time::Duration;

use crate::types::Level;
use crate::HalError;

/// Raw access to physical I/O lines, addressed by line number
///
/// # Implementations
/// - **Production:** `SysfsGpio` (Linux `/sys/class/gpio`)
/// - **Development:** `TerminalBoard` (crossterm, keys `1`–`8`)
/// - **Testing:** scripted in-memory boards
pub trait PinBackend {
    /// Configure `pin` as an output driven to `initial`.
    fn configure_output(&mut self, pin: u8, initial: Level) -> Result<(), HalError>;

    /// Configure `pin` as an input with pull-up bias (idle reads high).
    fn configure_input_pull_up(&mut self, pin: u8) -> Result<(), HalError>;

    fn write(&mut self, pin: u8, level: Level) -> Result<(), HalError>;

    fn read(&mut self, pin: u8) -> Result<Level, HalError>;

    /// Return `pin` to an inactive, unconfigured state.
    fn release(&mut self, pin: u8) -> Result<(), HalError>;
}

/// Blocking delay provider
pub trait Delay {
    fn delay(&mut self, duration: Duration);
}

/// [`Delay`] backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<B: PinBackend + ?Sized> PinBackend for Box<B> {
    fn configure_output(&mut self, pin: u8, initial: Level) -> Result<(), HalError> {
        (**self).configure_output(pin, initial)
    }

    fn configure_input_pull_up(&mut self, pin: u8) -> Result<(), HalError> {
        (**self).configure_input_pull_up(pin)
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<(), HalError> {
        (**self).write(pin, level)
    }

    fn read(&mut self, pin: u8) -> Result<Level, HalError> {
        (**self).read(pin)
    }

    fn release(&mut self, pin: u8) -> Result<(), HalError> {
        (**self).release(pin)
    }
}
