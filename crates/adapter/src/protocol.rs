//! Protocol module - JSON message types for the collaborator link
//!
//! One JSON object per line in each direction; every message has a `type`.

use serde::{Deserialize, Serialize};

use crate::core::{LeaderboardEntry, SessionState};

// ============== Client -> Controller Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Overwrite all session fields. A missing or blank username clears it.
    SetSession {
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        restart: bool,
        #[serde(default)]
        take_photo: bool,
    },
    GetSession,
    GetLeaderboard,
}

// ============== Controller -> Client Messages ==============

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Ack,
    Session(SessionState),
    Leaderboard { entries: Vec<LeaderboardEntry> },
    Error { code: ErrorCode, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Not a JSON object
    InvalidJson,
    /// JSON, but not a known message
    InvalidMessage,
}

pub fn parse_message(line: &str) -> Result<ClientMessage, (ErrorCode, String)> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| (ErrorCode::InvalidJson, e.to_string()))?;
    if !value.is_object() {
        return Err((ErrorCode::InvalidJson, "expected a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| (ErrorCode::InvalidMessage, e.to_string()))
}
