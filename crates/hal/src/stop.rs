use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-wide interrupt flag
///
/// Raised by the signal watcher (or the terminal board's key reader) and
/// checked by every blocking wait in [`crate::HardwareIo`].
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
