//! Hardware layer - pin access, blocking waits, and cleanup
//!
//! [`HardwareIo`] is the only component that touches physical lines. It sits on
//! top of a [`PinBackend`], so the same game loop drives real GPIO
//! ([`SysfsGpio`]), the terminal simulation, or a scripted test board.
//!
//! # Electrical Conventions
//!
//! - LEDs: output, high = lit, driven low at initialization and on shutdown
//! - Buttons: input with pull-up, idle = high, pressed = low

pub mod error;
pub mod io;
pub mod stop;
pub mod sysfs;
pub mod traits;

pub use simon_board_types as types;

pub use error::HalError;
pub use io::HardwareIo;
pub use stop::StopSignal;
pub use sysfs::{
    detect_base, BiasCommand, SysfsGpio, DEFAULT_BIAS_ARGS, DEFAULT_BIAS_PROGRAM, SYSFS_GPIO_ROOT,
};
pub use traits::{Delay, PinBackend, ThreadDelay};
