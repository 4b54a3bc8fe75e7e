//! Process configuration from environment variables

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::core::PatternEngine;
use crate::engine::{
    CommandCamera, NoCamera, PhotoCapture, DEFAULT_CAMERA_ARGS, DEFAULT_CAMERA_TIMEOUT,
    DEFAULT_PHOTO_DIR,
};
use crate::hal::{BiasCommand, PinBackend, StopSignal, SysfsGpio, SYSFS_GPIO_ROOT};
use crate::logging::LogConfig;
use crate::term::TerminalBoard;

pub const DEFAULT_LEADERBOARD_PATH: &str = "leaderboard.json";
pub const DEFAULT_TERMINAL_LOG: &str = "simon-board.log";

/// Which pin backend drives the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoardKind {
    /// Keyboard and screen stand in for buttons and LEDs
    #[default]
    Terminal,
    /// Linux sysfs GPIO
    Sysfs,
}

impl FromStr for BoardKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" | "term" => Ok(Self::Terminal),
            "sysfs" | "gpio" => Ok(Self::Sysfs),
            other => bail!("unknown board kind {other:?} (expected `terminal` or `sysfs`)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraConfig {
    /// Capture program; `None` means no camera
    pub command: Option<String>,
    pub args: Vec<String>,
    pub photo_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: DEFAULT_CAMERA_ARGS.iter().map(|a| a.to_string()).collect(),
            photo_dir: PathBuf::from(DEFAULT_PHOTO_DIR),
            timeout: DEFAULT_CAMERA_TIMEOUT,
        }
    }
}

impl CameraConfig {
    /// A running capture is abandoned once `stop` is raised.
    pub fn build(&self, stop: &StopSignal) -> Box<dyn PhotoCapture + Send> {
        match &self.command {
            Some(program) => Box::new(
                CommandCamera::new(program.clone(), self.photo_dir.clone())
                    .with_args(self.args.clone())
                    .with_timeout(self.timeout)
                    .with_stop(stop.clone()),
            ),
            None => Box::new(NoCamera),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub board: BoardKind,
    pub gpio_root: PathBuf,
    /// Kernel number of BCM pin 0; `None` reads it from the chip
    pub gpio_base: Option<u32>,
    /// Pull-up command for button lines; `None` relies on boot config
    pub gpio_bias: Option<BiasCommand>,
    pub leaderboard_path: PathBuf,
    pub seed: Option<u32>,
    pub camera: CameraConfig,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            board: BoardKind::default(),
            gpio_root: PathBuf::from(SYSFS_GPIO_ROOT),
            gpio_base: None,
            gpio_bias: Some(BiasCommand::default()),
            leaderboard_path: PathBuf::from(DEFAULT_LEADERBOARD_PATH),
            seed: None,
            camera: CameraConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log = LogConfig::from_env();
        Ok(config)
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(board) = get("SIMON_BOARD") {
            config.board = board.parse()?;
        }
        if let Some(root) = get("SIMON_GPIO_ROOT") {
            config.gpio_root = root.into();
        }
        if let Some(base) = get("SIMON_GPIO_BASE") {
            let base = base
                .parse()
                .with_context(|| format!("SIMON_GPIO_BASE must be a u32, got {base:?}"))?;
            config.gpio_base = Some(base);
        }
        match get("SIMON_GPIO_BIAS_CMD").as_deref() {
            Some("none") => config.gpio_bias = None,
            Some(program) => {
                config.gpio_bias = Some(BiasCommand::new(program, Vec::new()));
            }
            None => {}
        }
        // A custom bias program starts with no arguments.
        if let (Some(bias), Some(args)) = (config.gpio_bias.as_mut(), get("SIMON_GPIO_BIAS_ARGS")) {
            bias.args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(path) = get("SIMON_LEADERBOARD_PATH") {
            config.leaderboard_path = path.into();
        }
        if let Some(seed) = get("SIMON_SEED") {
            let seed = seed
                .parse()
                .with_context(|| format!("SIMON_SEED must be a u32, got {seed:?}"))?;
            config.seed = Some(seed);
        }
        config.camera.command = get("SIMON_CAMERA_CMD");
        if let Some(args) = get("SIMON_CAMERA_ARGS") {
            config.camera.args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(dir) = get("SIMON_PHOTO_DIR") {
            config.camera.photo_dir = dir.into();
        }
        if let Some(ms) = get("SIMON_CAMERA_TIMEOUT_MS") {
            let ms = ms
                .parse()
                .with_context(|| format!("SIMON_CAMERA_TIMEOUT_MS must be a u64, got {ms:?}"))?;
            config.camera.timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Open the configured pin backend.
    ///
    /// The terminal board takes over the screen until it is dropped.
    pub fn open_board(&self, stop: &StopSignal) -> Result<Box<dyn PinBackend>> {
        Ok(match self.board {
            BoardKind::Terminal => Box::new(
                TerminalBoard::enter(stop.clone()).context("failed to set up the terminal board")?,
            ),
            BoardKind::Sysfs => Box::new(self.sysfs_gpio()),
        })
    }

    fn sysfs_gpio(&self) -> SysfsGpio {
        let gpio = match self.gpio_base {
            Some(base) => SysfsGpio::new(self.gpio_root.clone()).with_base(base),
            None => SysfsGpio::detect(self.gpio_root.clone()),
        };
        match &self.gpio_bias {
            Some(bias) => gpio.with_bias_command(bias.clone()),
            None => gpio,
        }
    }

    /// Terminal board output owns the screen, so logs default to a file there.
    pub fn log_config(&self) -> LogConfig {
        let mut log = self.log.clone();
        if self.board == BoardKind::Terminal && log.file.is_none() {
            log.file = Some(DEFAULT_TERMINAL_LOG.to_string());
        }
        log
    }

    pub fn pattern_engine(&self) -> PatternEngine {
        match self.seed {
            Some(seed) => PatternEngine::new(seed),
            None => PatternEngine::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.board, BoardKind::Terminal);
        assert_eq!(config.leaderboard_path, PathBuf::from("leaderboard.json"));
        assert_eq!(config.camera.photo_dir, PathBuf::from("static/photos"));
        assert!(config.camera.command.is_none());
        assert_eq!(config.camera.timeout, Duration::from_secs(12));
        assert_eq!(config.gpio_base, None);
        let bias = config.gpio_bias.as_ref().unwrap();
        assert_eq!(bias.program, "pinctrl");
        assert_eq!(bias.args, vec!["set", "{pin}", "ip", "pu"]);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SIMON_BOARD", "SYSFS"),
            ("SIMON_SEED", "42"),
            ("SIMON_CAMERA_CMD", "libcamera-still"),
            ("SIMON_CAMERA_ARGS", "-o {output}"),
            ("SIMON_LEADERBOARD_PATH", "/var/lib/simon/scores.json"),
            ("SIMON_CAMERA_TIMEOUT_MS", "5000"),
            ("SIMON_GPIO_BASE", "512"),
            ("SIMON_GPIO_BIAS_CMD", "raspi-gpio"),
            ("SIMON_GPIO_BIAS_ARGS", "set {pin} ip pu"),
        ]))
        .unwrap();
        assert_eq!(config.camera.timeout, Duration::from_millis(5000));
        assert_eq!(config.gpio_base, Some(512));
        let bias = config.gpio_bias.as_ref().unwrap();
        assert_eq!(bias.program, "raspi-gpio");
        assert_eq!(bias.args, vec!["set", "{pin}", "ip", "pu"]);
        assert_eq!(config.board, BoardKind::Sysfs);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.camera.command.as_deref(), Some("libcamera-still"));
        assert_eq!(config.camera.args, vec!["-o", "{output}"]);
        assert_eq!(
            config.leaderboard_path,
            PathBuf::from("/var/lib/simon/scores.json")
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = AppConfig::from_lookup(lookup(&[("SIMON_CAMERA_CMD", "  ")])).unwrap();
        assert!(config.camera.command.is_none());
    }

    #[test]
    fn test_bias_command_can_be_disabled() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SIMON_GPIO_BIAS_CMD", "none"),
            ("SIMON_GPIO_BIAS_ARGS", "ignored"),
        ]))
        .unwrap();
        assert!(config.gpio_bias.is_none());
    }

    #[test]
    fn test_configured_base_wins_over_detection() {
        let root = tempfile::tempdir().unwrap();
        let config = AppConfig {
            board: BoardKind::Sysfs,
            gpio_root: root.path().to_path_buf(),
            gpio_base: Some(571),
            ..AppConfig::default()
        };
        assert_eq!(config.sysfs_gpio().line(4), 575);
    }

    #[test]
    fn test_terminal_board_logs_to_file() {
        let config = AppConfig::default();
        assert_eq!(config.log_config().file.as_deref(), Some("simon-board.log"));

        let sysfs = AppConfig {
            board: BoardKind::Sysfs,
            ..AppConfig::default()
        };
        assert!(sysfs.log_config().file.is_none());
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(AppConfig::from_lookup(lookup(&[("SIMON_BOARD", "spi")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("SIMON_SEED", "-1")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("SIMON_GPIO_BASE", "pi")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("SIMON_CAMERA_TIMEOUT_MS", "soon")])).is_err());
    }

    #[test]
    fn test_seeded_engine_is_reproducible() {
        let config = AppConfig {
            seed: Some(9),
            ..AppConfig::default()
        };
        let mut a = config.pattern_engine();
        let mut b = config.pattern_engine();
        assert_eq!(a.generate(5), b.generate(5));
    }
}
