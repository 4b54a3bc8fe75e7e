//! Shared session state
//!
//! Written by the external collaborator at any time, read by the control loop.
//! Every access goes through one mutex, so a snapshot taken by the control loop
//! sees either all or none of a collaborator's update.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// Process-wide session fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub username: Option<String>,
    #[serde(rename = "restart")]
    pub restart_requested: bool,
    pub take_photo: bool,
}

/// What the control loop keeps for the duration of one session
///
/// Taken once at the Idle → RoundActive transition. `restart_requested` is
/// carried along but nothing consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub username: String,
    pub take_photo: bool,
    pub restart_requested: bool,
}

/// Handle to the shared [`SessionState`]; clones share the same state
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionState>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite all three fields at once.
    ///
    /// A blank username is stored as "no username".
    pub fn set(&self, username: Option<String>, restart_requested: bool, take_photo: bool) {
        let username = username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let mut state = self.lock();
        state.username = username;
        state.restart_requested = restart_requested;
        state.take_photo = take_photo;
    }

    /// Copy of the current fields, for display
    pub fn state(&self) -> SessionState {
        self.lock().clone()
    }

    /// Snapshot for a new session, or `None` while no username is set.
    pub fn start_snapshot(&self) -> Option<SessionSnapshot> {
        let state = self.lock();
        state.username.as_ref().map(|username| SessionSnapshot {
            username: username.clone(),
            take_photo: state.take_photo,
            restart_requested: state.restart_requested,
        })
    }

    pub fn clear_username(&self) {
        self.lock().username = None;
    }
}
