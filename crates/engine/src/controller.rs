//! Game controller - the round-by-round state machine
//!
//! ```text
//! Idle ──username set──▶ RoundActive(1) ──shown + collected──▶ Evaluating
//!  ▲                          ▲   │                                 │
//!  │                          │   └─round > max_rounds──▶ Idle      │
//!  │                          └──────────── match ──────────────────┤
//!  └────────────── GameOver(score = round) ◀──── mismatch ──────────┘
//! ```
//!
//! The session fields are read exactly once, at the Idle → RoundActive
//! transition. Writes by the collaborator during a session are only seen at
//! the next Idle tick.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::board::{collect_input, display_pattern, flash_all};
use crate::core::{matches, LeaderboardEntry, LeaderboardStore, PatternEngine};
use crate::core::{SessionSnapshot, SharedSession};
use crate::hal::{Delay, HardwareIo, PinBackend};
use crate::photo::PhotoCapture;
use crate::timing::ControllerConfig;
use crate::types::{ButtonCode, Pattern, UserInput};
use crate::GameError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No active session
    Idle,
    /// About to show and collect the pattern for `round`
    RoundActive { round: u32 },
    /// Pattern shown and input collected, not yet compared
    Evaluating {
        round: u32,
        pattern: Pattern,
        input: UserInput,
    },
    /// Session lost at `score`; result not yet recorded
    GameOver { score: u32 },
}

pub struct GameController<B: PinBackend, D: Delay> {
    io: HardwareIo<B, D>,
    engine: PatternEngine,
    session: SharedSession,
    leaderboard: Arc<LeaderboardStore>,
    camera: Box<dyn PhotoCapture + Send>,
    config: ControllerConfig,
    phase: Phase,
    active: Option<SessionSnapshot>,
    waiting_logged: bool,
}

impl<B: PinBackend, D: Delay> GameController<B, D> {
    /// Build a controller, initializing `io` if that has not happened yet.
    pub fn new(
        mut io: HardwareIo<B, D>,
        engine: PatternEngine,
        session: SharedSession,
        leaderboard: Arc<LeaderboardStore>,
        camera: Box<dyn PhotoCapture + Send>,
        config: ControllerConfig,
    ) -> Result<Self, GameError> {
        if !io.is_ready() {
            io.initialize()?;
        }
        Ok(Self {
            io,
            engine,
            session,
            leaderboard,
            camera,
            config,
            phase: Phase::Idle,
            active: None,
            waiting_logged: false,
        })
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Snapshot of the session currently being played
    pub fn active_session(&self) -> Option<&SessionSnapshot> {
        self.active.as_ref()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn io(&self) -> &HardwareIo<B, D> {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut HardwareIo<B, D> {
        &mut self.io
    }

    /// Run until the stop signal is raised. Hardware is released on return
    /// (and on any error, via drop).
    pub fn run(&mut self) -> Result<(), GameError> {
        info!(max_rounds = self.config.max_rounds, "control loop started");
        loop {
            match self.step() {
                Ok(()) => {}
                Err(e) if e.is_interrupted() => {
                    info!("stop requested, leaving control loop");
                    self.io.shutdown()?;
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Play one whole session if a username is waiting; otherwise do a single
    /// idle tick.
    pub fn play_session(&mut self) -> Result<(), GameError> {
        self.step()?;
        while self.phase != Phase::Idle {
            self.step()?;
        }
        Ok(())
    }

    /// Perform exactly one state transition.
    pub fn step(&mut self) -> Result<(), GameError> {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        self.phase = match phase {
            Phase::Idle => self.idle_tick()?,
            Phase::RoundActive { round } => self.play_round(round)?,
            Phase::Evaluating {
                round,
                pattern,
                input,
            } => self.evaluate(round, &pattern, &input),
            Phase::GameOver { score } => self.game_over(score)?,
        };
        Ok(())
    }

    fn idle_tick(&mut self) -> Result<Phase, GameError> {
        match self.session.start_snapshot() {
            None => {
                if !self.waiting_logged {
                    info!("no username provided, waiting for input from the web interface");
                    self.waiting_logged = true;
                }
                self.io.sleep(self.config.timing.idle_poll)?;
                Ok(Phase::Idle)
            }
            Some(snapshot) => {
                info!(
                    username = %snapshot.username,
                    take_photo = snapshot.take_photo,
                    "session started"
                );
                self.waiting_logged = false;
                self.active = Some(snapshot);
                Ok(Phase::RoundActive { round: 1 })
            }
        }
    }

    fn play_round(&mut self, round: u32) -> Result<Phase, GameError> {
        if round > self.config.max_rounds {
            // Perfect run: the session ends without a leaderboard entry.
            info!(
                round,
                max_rounds = self.config.max_rounds,
                "round cap reached, ending session without a result"
            );
            self.end_session();
            return Ok(Phase::Idle);
        }

        let timing = self.config.timing;
        self.io.sleep(timing.round_delay)?;

        let pattern = self.engine.generate(round);
        debug!(round, %pattern, "showing pattern");
        display_pattern(&mut self.io, &pattern, &timing)?;

        let input = collect_input(&mut self.io, pattern.len(), &timing)?;
        Ok(Phase::Evaluating {
            round,
            pattern,
            input,
        })
    }

    fn evaluate(&self, round: u32, pattern: &Pattern, input: &[ButtonCode]) -> Phase {
        if matches(pattern, input) {
            info!(round, "round cleared");
            Phase::RoundActive { round: round + 1 }
        } else {
            info!(score = round, "game over");
            Phase::GameOver { score: round }
        }
    }

    fn game_over(&mut self, score: u32) -> Result<Phase, GameError> {
        flash_all(&mut self.io, self.config.timing.game_over_flash)?;

        let Some(session) = self.active.take() else {
            warn!(score, "game over without an active session");
            return Ok(Phase::Idle);
        };

        let photo_path = if session.take_photo {
            self.camera.capture(&session.username, score)
        } else {
            None
        };

        let entry = LeaderboardEntry::new(session.username, score, photo_path);
        if let Err(e) = self.leaderboard.record(entry) {
            error!(error = %e, "failed to persist leaderboard");
        }

        self.session.clear_username();
        info!("restarting game");
        Ok(Phase::Idle)
    }

    fn end_session(&mut self) {
        self.active = None;
        self.session.clear_username();
    }
}
