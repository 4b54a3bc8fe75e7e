//! Game engine - drives the board through escalating rounds
//!
//! Ties together the hardware layer and the core logic:
//!
//! - [`controller`]: the Idle → RoundActive → Evaluating → GameOver state machine
//! - [`board`]: pattern display, input collection, and the game-over flash
//! - [`photo`]: the optional photo-capture collaborator
//! - [`timing`]: game cadence and the round cap
//!
//! # Timing
//!
//! - **Round delay**: 1s before each pattern
//! - **Pattern step**: LED on 500ms, then 200ms dark
//! - **Input echo**: LED on 500ms per press, then wait for release (100ms sampling)
//! - **Game over**: all LEDs on for 3s

pub mod board;
pub mod controller;
pub mod error;
pub mod photo;
pub mod timing;

pub use simon_board_core as core;
pub use simon_board_hal as hal;
pub use simon_board_types as types;

pub use board::{collect_input, display_pattern, flash_all};
pub use controller::{GameController, Phase};
pub use error::GameError;
pub use photo::{
    CommandCamera, NoCamera, PhotoCapture, DEFAULT_CAMERA_ARGS, DEFAULT_CAMERA_TIMEOUT,
    DEFAULT_PHOTO_DIR,
};
pub use timing::{ControllerConfig, Timing};
