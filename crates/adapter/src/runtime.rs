//! Adapter runtime integration.
//!
//! Bridges the blocking game loop with the async listener and the signal
//! watcher. Both run on a private tokio runtime owned by `Adapter`.

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing::{error, info};

use crate::hal::StopSignal;
use crate::server::{bind, serve, ServerConfig, SharedState};
use crate::signals::{relay, ShutdownSignals};

/// Running adapter instance. Dropping it shuts the runtime down.
pub struct Adapter {
    rt: Runtime,
}

impl Adapter {
    /// Start the interrupt watcher and, when `config` is set, the listener.
    ///
    /// Binding happens before this returns so an occupied port is reported
    /// to the caller.
    pub fn start(
        config: Option<ServerConfig>,
        state: SharedState,
        stop: StopSignal,
    ) -> Result<Self> {
        let adapter = Self::watch_interrupts(stop)?;

        match config {
            Some(config) => {
                let listener = adapter.rt.block_on(bind(&config))?;
                adapter.rt.spawn(async move {
                    if let Err(e) = serve(listener, state).await {
                        error!(error = %e, "collaborator listener stopped");
                    }
                });
            }
            None => info!("collaborator listener disabled"),
        }

        Ok(adapter)
    }

    /// Only raise `stop` on SIGINT, SIGTERM or SIGHUP; no listener.
    pub fn watch_interrupts(stop: StopSignal) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let signals = {
            let _guard = rt.enter();
            ShutdownSignals::register().context("cannot install signal handlers")?
        };
        rt.spawn(relay(signals, stop));
        Ok(Self { rt })
    }

    /// Start from environment variables.
    ///
    /// The listener is skipped if `SIMON_WEB_DISABLED` is set.
    pub fn start_from_env(state: SharedState, stop: StopSignal) -> Result<Self> {
        let config = (!ServerConfig::is_disabled()).then(ServerConfig::from_env);
        Self::start(config, state, stop)
    }
}
