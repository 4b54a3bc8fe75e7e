use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Where log lines go and in which format
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub file: Option<String>,
    pub json: bool,
}

impl LogConfig {
    /// Read `SIMON_LOG_FILE` and `SIMON_LOG_JSON`
    pub fn from_env() -> Self {
        let file = std::env::var("SIMON_LOG_FILE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let json = std::env::var("SIMON_LOG_JSON")
            .map(|value| value == "1")
            .unwrap_or(false);
        Self { file, json }
    }
}

/// Install the global subscriber. `RUST_LOG` filters, default `info`.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(Path::new(path))
                .with_context(|| format!("cannot open log file {path}"))?;
            let builder = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            if config.json {
                let _ = builder.json().try_init();
            } else {
                let _ = builder.try_init();
            }
        }
        None => {
            let builder = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr);
            if config.json {
                let _ = builder.json().try_init();
            } else {
                let _ = builder.try_init();
            }
        }
    }
    Ok(())
}
