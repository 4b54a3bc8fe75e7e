use thiserror::Error;

/// Errors from pin access and the blocking waits built on it
#[derive(Debug, Error)]
pub enum HalError {
    /// A logical button/LED index outside 1..=8. Unreachable with valid codes.
    #[error("logical index {0} is outside 1..=8")]
    InvalidIndex(u8),

    #[error("hardware used before initialize()")]
    NotInitialized,

    #[error("hardware already initialized")]
    AlreadyInitialized,

    /// The process stop signal was raised during a wait.
    #[error("interrupted")]
    Interrupted,

    #[error("GPIO line {pin}: {source}")]
    Io {
        pin: u8,
        #[source]
        source: std::io::Error,
    },
}

impl HalError {
    pub fn io(pin: u8, source: std::io::Error) -> Self {
        Self::Io { pin, source }
    }
}
