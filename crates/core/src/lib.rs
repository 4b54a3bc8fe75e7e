//! Core game logic - hardware-free, deterministic, and testable
//!
//! This crate holds everything the controller decides without touching a pin:
//!
//! - [`rng`]: seeded LCG, so a fixed seed replays the same session
//! - [`pattern`]: round pattern generation and exact-match comparison
//! - [`session`]: the session fields shared with the external collaborator
//! - [`leaderboard`]: the persisted, score-sorted result list
//!
//! # Example
//!
//! ```
//! use simon_board_core::{matches, PatternEngine};
//!
//! let mut engine = PatternEngine::new(12345);
//! let pattern = engine.generate(3);
//! assert_eq!(pattern.len(), 3);
//! assert!(matches(&pattern, pattern.as_slice()));
//! ```

pub mod error;
pub mod leaderboard;
pub mod pattern;
pub mod rng;
pub mod session;

pub use simon_board_types as types;

pub use error::LeaderboardError;
pub use leaderboard::{LeaderboardEntry, LeaderboardStore, NO_PHOTO};
pub use pattern::{matches, PatternEngine};
pub use rng::SimpleRng;
pub use session::{SessionSnapshot, SessionState, SharedSession};
