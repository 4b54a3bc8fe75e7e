//! Simon board controller (default binary).
//!
//! Opens the leaderboard, starts the collaborator listener, and runs the game
//! loop on the configured board until interrupted.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use simon_board::adapter::{Adapter, SharedState};
use simon_board::config::AppConfig;
use simon_board::core::{LeaderboardStore, SharedSession};
use simon_board::engine::{ControllerConfig, GameController};
use simon_board::hal::{HardwareIo, StopSignal, ThreadDelay};
use simon_board::logging::init_logging;

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(&config.log_config())?;

    let leaderboard = LeaderboardStore::open(&config.leaderboard_path).with_context(|| {
        format!(
            "cannot open leaderboard {}",
            config.leaderboard_path.display()
        )
    })?;
    let leaderboard = Arc::new(leaderboard);
    let session = SharedSession::new();
    let stop = StopSignal::new();

    let _adapter = Adapter::start_from_env(
        SharedState {
            session: session.clone(),
            leaderboard: Arc::clone(&leaderboard),
        },
        stop.clone(),
    )?;

    let board = config.open_board(&stop)?;
    let camera = config.camera.build(&stop);
    let io = HardwareIo::new(board, ThreadDelay, stop);
    let mut controller = GameController::new(
        io,
        config.pattern_engine(),
        session,
        leaderboard,
        camera,
        ControllerConfig::default(),
    )
    .context("failed to initialize hardware")?;

    controller.run().context("control loop failed")?;
    info!("controller stopped");
    Ok(())
}
