use thiserror::Error;

use crate::hal::HalError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("hardware: {0}")]
    Hal(#[from] HalError),
}

impl GameError {
    /// True when the error is the stop signal, i.e. the cleanup path.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, GameError::Hal(HalError::Interrupted))
    }
}
