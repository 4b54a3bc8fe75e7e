//! Collaborator link - session and leaderboard access over TCP
//!
//! A companion process (typically a web front end) sets the player for the
//! next game and reads the leaderboard through a **line-delimited JSON
//! protocol**:
//!
//! - `{"type":"set_session","username":"ann","take_photo":true}` → `{"type":"ack"}`
//! - `{"type":"get_session"}` → `{"type":"session",...}`
//! - `{"type":"get_leaderboard"}` → `{"type":"leaderboard","entries":[...]}`
//!
//! Malformed requests get `{"type":"error","code":...,"message":...}` and
//! change nothing. The game loop never waits on this link.

pub mod protocol;
pub mod runtime;
pub mod server;
pub mod signals;

pub use simon_board_core as core;
pub use simon_board_hal as hal;

pub use protocol::{parse_message, ClientMessage, ErrorCode, ServerMessage};
pub use runtime::Adapter;
pub use server::{run_server, ServerConfig, SharedState};
pub use signals::{relay, ShutdownSignals};
