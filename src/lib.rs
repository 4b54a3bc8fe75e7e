//! Simon board (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and holds the
//! process-level pieces shared by the binaries: environment configuration
//! and logging setup.

pub mod config;
pub mod logging;

pub use simon_board_adapter as adapter;
pub use simon_board_core as core;
pub use simon_board_engine as engine;
pub use simon_board_hal as hal;
pub use simon_board_term as term;
pub use simon_board_types as types;
