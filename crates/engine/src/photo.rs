//! Photo capture collaborator
//!
//! Capture is optional. A missing camera, a failing capture program, or an
//! unwritable directory all come back as "no photo" and are only logged; none
//! of them reach the control loop as an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use simon_board_hal::StopSignal;
use tracing::{info, warn};

/// Default directory for captured images
pub const DEFAULT_PHOTO_DIR: &str = "static/photos";

/// Default still-capture arguments (640x480, 2s preview, no preview window).
/// `{output}` is replaced with the image path.
pub const DEFAULT_CAMERA_ARGS: &[&str] = &[
    "-n", "-t", "2000", "--width", "640", "--height", "480", "-o", "{output}",
];

/// Longest a capture program may run before it is killed
pub const DEFAULT_CAMERA_TIMEOUT: Duration = Duration::from_secs(12);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub trait PhotoCapture {
    /// Take a photo for this result and return where it was stored.
    fn capture(&mut self, username: &str, score: u32) -> Option<String>;
}

/// Used when no camera is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCamera;

impl PhotoCapture for NoCamera {
    fn capture(&mut self, username: &str, score: u32) -> Option<String> {
        info!(username, score, "camera not available, skipping photo");
        None
    }
}

/// Runs an external still-capture program (e.g. `libcamera-still`)
#[derive(Debug, Clone)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
    photo_dir: PathBuf,
    timeout: Duration,
    stop: Option<StopSignal>,
}

impl CommandCamera {
    pub fn new(program: impl Into<String>, photo_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: DEFAULT_CAMERA_ARGS.iter().map(|a| a.to_string()).collect(),
            photo_dir: photo_dir.into(),
            timeout: DEFAULT_CAMERA_TIMEOUT,
            stop: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Abandon a running capture once `stop` is raised.
    pub fn with_stop(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    /// `<photo_dir>/<username>_<score>.jpg`
    pub fn photo_path(&self, username: &str, score: u32) -> PathBuf {
        self.photo_dir
            .join(format!("{}_{}.jpg", sanitize_username(username), score))
    }

    fn run(&self, output: &Path) -> Result<(), String> {
        // A leftover image from an earlier game must not pass for this one.
        match fs::remove_file(output) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(format!("cannot remove stale {}: {}", output.display(), e)),
        }

        let output_arg = output.to_string_lossy();
        let args = self.args.iter().map(|a| a.replace("{output}", &output_arg));

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => format!("camera program {:?} not found", self.program),
                _ => format!("failed to start {:?}: {}", self.program, e),
            })?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => return Err(format!("cannot wait for {:?}: {}", self.program, e)),
            }

            let stopping = self.stop.as_ref().is_some_and(StopSignal::is_triggered);
            if stopping || Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(if stopping {
                    format!("{:?} abandoned on shutdown", self.program)
                } else {
                    format!("{:?} timed out after {:?}", self.program, self.timeout)
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            return Err(format!("{:?} exited with {}", self.program, status));
        }
        if !output.exists() {
            return Err(format!("{:?} produced no image", self.program));
        }
        Ok(())
    }
}

impl PhotoCapture for CommandCamera {
    fn capture(&mut self, username: &str, score: u32) -> Option<String> {
        if let Err(e) = fs::create_dir_all(&self.photo_dir) {
            warn!(dir = %self.photo_dir.display(), error = %e, "cannot create photo directory");
            return None;
        }

        let path = self.photo_path(username, score);
        match self.run(&path) {
            Ok(()) => {
                info!(path = %path.display(), "photo captured");
                Some(path.to_string_lossy().into_owned())
            }
            Err(reason) => {
                warn!(username, score, %reason, "photo capture failed");
                None
            }
        }
    }
}

/// Keep `[A-Za-z0-9_-]`, replace everything else, so a username can never
/// escape the photo directory.
pub fn sanitize_username(username: &str) -> String {
    let cleaned: String = username
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "player".to_string()
    } else {
        cleaned
    }
}
