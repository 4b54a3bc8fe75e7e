//! Process termination signals mapped onto the board's stop signal.
//!
//! Handlers are installed by [`ShutdownSignals::register`], before anything
//! waits on them, so a signal delivered right after startup is not lost.

use std::io;

use tracing::info;

use crate::hal::StopSignal;

#[cfg(unix)]
pub struct ShutdownSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
}

#[cfg(not(unix))]
pub struct ShutdownSignals;

impl ShutdownSignals {
    /// Install the handlers. Must be called inside a tokio runtime.
    #[cfg(unix)]
    pub fn register() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            hangup: signal(SignalKind::hangup())?,
        })
    }

    #[cfg(not(unix))]
    pub fn register() -> io::Result<Self> {
        Ok(Self)
    }

    /// Wait for the first termination signal and return its name.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.hangup.recv() => "SIGHUP",
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "Ctrl-C",
            Err(_) => std::future::pending().await,
        }
    }
}

/// Raise `stop` on the first termination signal.
pub async fn relay(mut signals: ShutdownSignals, stop: StopSignal) {
    let name = signals.recv().await;
    info!(signal = name, "termination requested, stopping");
    stop.trigger();
}
